//! Host objects (`<rdeHost:host>`).

use serde::Serialize;

use super::common::statuses;
use crate::element::Element;
use crate::error::Result;

/// A host address (`<addr ip="v4">192.0.2.2</addr>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostAddress {
    /// IP version tag (`v4` or `v6`)
    pub version: String,
    /// Address literal
    pub address: String,
}

/// An escrowed name server host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    /// Host name
    pub name: String,
    /// Repository object id
    pub roid: String,
    /// Status codes in document order
    pub statuses: Vec<String>,
    /// Addresses in document order
    pub addresses: Vec<HostAddress>,
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

impl Host {
    /// Builds a host from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        let addresses = el
            .children_named("addr")
            .map(|a| HostAddress {
                version: a.attr_or_empty("ip"),
                address: a.text.clone(),
            })
            .collect();

        Ok(Self {
            name: el.child_text("name"),
            roid: el.child_text("roid"),
            statuses: statuses(el),
            addresses,
            client_id: el.child_text("clID"),
            creator: el.child_text("crRr"),
            created: el.child_text("crDate"),
            updater: el.child_text("upRr"),
            updated: el.child_text("upDate"),
        })
    }
}
