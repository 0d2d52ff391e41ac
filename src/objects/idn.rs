//! IDN table references and NNDN objects.

use serde::Serialize;

use crate::element::Element;
use crate::error::Result;

/// An IDN table reference (`<rdeIDN:idnTableRef id="...">`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdnTableReference {
    /// Table id
    pub id: String,
    /// Table URL
    pub url: String,
    /// Registration policy URL
    pub url_policy: String,
}

impl IdnTableReference {
    /// Builds an IDN table reference from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            id: el.attr_or_empty("id"),
            url: el.child_text("url"),
            url_policy: el.child_text("urlPolicy"),
        })
    }
}

/// A non-delegated name (`<rdeNNDN:NNDN>`): blocked or withheld variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nndn {
    /// A-label
    pub aname: String,
    /// U-label
    pub uname: String,
    /// IDN table id
    pub idn_table_id: String,
    /// Name this one is a variant of
    pub original_name: String,
    /// `blocked` or `withheld`
    pub name_state: String,
    /// Creation date
    pub created: String,
}

impl Nndn {
    /// Builds an NNDN from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            aname: el.child_text("aName"),
            uname: el.child_text("uName"),
            idn_table_id: el.child_text("idnTableId"),
            original_name: el.child_text("originalName"),
            name_state: el.child_text("nameState"),
            created: el.child_text("crDate"),
        })
    }
}
