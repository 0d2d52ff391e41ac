//! Registrar objects (`<rdeRegistrar:registrar>`).

use serde::Serialize;

use super::common::PostalInfo;
use crate::element::Element;
use crate::error::Result;

/// Whois service details of a registrar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WhoisInfo {
    /// Whois server name
    pub name: String,
    /// Web whois URL
    pub url: String,
}

/// An escrowed registrar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrar {
    /// Registrar id
    pub id: String,
    /// Display name
    pub name: String,
    /// IANA registrar id
    pub gurid: i64,
    /// Status (`ok`, `readonly`, `terminated`)
    pub status: String,
    /// Postal info records
    pub postal_info: Vec<PostalInfo>,
    /// Voice number
    pub voice: String,
    /// Fax number
    pub fax: String,
    /// Email address
    pub email: String,
    /// Web site
    pub url: String,
    /// Whois details
    pub whois_info: WhoisInfo,
    /// Creation date
    pub created: String,
    /// Last update date
    pub updated: String,
}

impl Registrar {
    /// Builds a registrar from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        let whois_info = el
            .child("whoisInfo")
            .map(|w| WhoisInfo {
                name: w.child_text("name"),
                url: w.child_text("url"),
            })
            .unwrap_or_default();

        Ok(Self {
            id: el.child_text("id"),
            name: el.child_text("name"),
            gurid: el.child_int("gurid")?,
            status: el.child_text("status"),
            postal_info: el
                .children_named("postalInfo")
                .map(PostalInfo::from_element)
                .collect(),
            voice: el.child_text("voice"),
            fax: el.child_text("fax"),
            email: el.child_text("email"),
            url: el.child_text("url"),
            whois_info,
            created: el.child_text("crDate"),
            updated: el.child_text("upDate"),
        })
    }
}
