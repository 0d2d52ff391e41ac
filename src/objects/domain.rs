//! Domain name objects (`<rdeDomain:domain>`).

use serde::Serialize;

use super::common::statuses;
use crate::element::Element;
use crate::error::Result;

/// A domain contact reference (`<contact type="admin">id</contact>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainContact {
    /// Contact role (`admin`, `tech`, `billing`)
    pub contact_type: String,
    /// Referenced contact id
    pub id: String,
}

/// A DNSSEC delegation signer record (`<secDNS:dsData>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DsData {
    /// Key tag
    pub key_tag: i64,
    /// Algorithm number
    pub alg: i64,
    /// Digest type number
    pub digest_type: i64,
    /// Hex digest
    pub digest: String,
}

impl DsData {
    fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            key_tag: el.child_int("keyTag")?,
            alg: el.child_int("alg")?,
            digest_type: el.child_int("digestType")?,
            digest: el.child_text("digest"),
        })
    }
}

/// Pending or completed transfer data (`<rdeDomain:trnData>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferData {
    /// Transfer state (`pending`, `clientApproved`, ...)
    pub state: String,
    /// Requesting registrar id
    pub requesting_registrar: String,
    /// Request date
    pub request_date: String,
    /// Acting registrar id
    pub accepting_registrar: String,
    /// Action date
    pub accept_date: String,
    /// Expiry date after transfer
    pub expiry_date: String,
}

impl TransferData {
    fn from_element(el: &Element) -> Self {
        Self {
            state: el.child_text("trStatus"),
            requesting_registrar: el.child_text("reRr"),
            request_date: el.child_text("reDate"),
            accepting_registrar: el.child_text("acRr"),
            accept_date: el.child_text("acDate"),
            expiry_date: el.child_text("exDate"),
        }
    }
}

/// An escrowed domain name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Fully qualified name (A-label for IDNs)
    pub name: String,
    /// Repository object id
    pub roid: String,
    /// U-label
    pub uname: String,
    /// IDN table id
    pub idn_table_id: String,
    /// Original name, for variants
    pub original_name: String,
    /// Status codes in document order
    pub statuses: Vec<String>,
    /// Registrant contact id
    pub registrant: String,
    /// Contact references in document order
    pub contacts: Vec<DomainContact>,
    /// Nameserver groups, each a list of host names
    pub nameservers: Vec<Vec<String>>,
    /// Sponsoring registrar
    pub client_id: String,
    /// Creating registrar
    pub creator: String,
    /// Creation date
    pub created: String,
    /// Expiry date
    pub expires: String,
    /// Last updating registrar
    pub updater: String,
    /// Last update date
    pub updated: String,
    /// DNSSEC delegation signer records
    pub ds_data: Vec<DsData>,
    /// Transfer data, when the element is present
    pub transfer: Option<TransferData>,
}

impl Domain {
    /// Builds a domain from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        let contacts = el
            .children_named("contact")
            .map(|c| DomainContact {
                contact_type: c.attr_or_empty("type"),
                id: c.text.clone(),
            })
            .collect();

        let nameservers = el
            .children_named("ns")
            .map(|ns| ns.children_text("hostObj"))
            .collect();

        let ds_data = match el.child("secDNS") {
            Some(sec) => sec
                .children_named("dsData")
                .map(DsData::from_element)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            name: el.child_text("name"),
            roid: el.child_text("roid"),
            uname: el.child_text("uName"),
            idn_table_id: el.child_text("idnTableId"),
            original_name: el.child_text("originalName"),
            statuses: statuses(el),
            registrant: el.child_text("registrant"),
            contacts,
            nameservers,
            client_id: el.child_text("clID"),
            creator: el.child_text("crRr"),
            created: el.child_text("crDate"),
            expires: el.child_text("exDate"),
            updater: el.child_text("upRr"),
            updated: el.child_text("upDate"),
            ds_data,
            transfer: el.child("trnData").map(TransferData::from_element),
        })
    }

    /// Returns the transfer record only when its state is non-empty.
    pub fn active_transfer(&self) -> Option<&TransferData> {
        self.transfer
            .as_ref()
            .filter(|t| !t.state.trim().is_empty())
    }
}
