//! Contact objects (`<rdeContact:contact>`).

use serde::Serialize;

use super::common::{statuses, PostalInfo};
use crate::element::Element;
use crate::error::Result;

/// An escrowed contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact id
    pub id: String,
    /// Repository object id
    pub roid: String,
    /// Status codes in document order
    pub statuses: Vec<String>,
    /// Postal info records (`int`/`loc`)
    pub postal_info: Vec<PostalInfo>,
    /// Voice number
    pub voice: String,
    /// Fax number
    pub fax: String,
    /// Email address
    pub email: String,
    /// Sponsoring registrar
    pub client_id: String,
    /// Creating registrar
    pub creator: String,
    /// Creation date
    pub created: String,
    /// Last updating registrar
    pub updater: String,
    /// Last update date
    pub updated: String,
}

impl Contact {
    /// Builds a contact from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            id: el.child_text("id"),
            roid: el.child_text("roid"),
            statuses: statuses(el),
            postal_info: el
                .children_named("postalInfo")
                .map(PostalInfo::from_element)
                .collect(),
            voice: el.child_text("voice"),
            fax: el.child_text("fax"),
            email: el.child_text("email"),
            client_id: el.child_text("clID"),
            creator: el.child_text("crRr"),
            created: el.child_text("crDate"),
            updater: el.child_text("upRr"),
            updated: el.child_text("upDate"),
        })
    }
}
