//! EPP parameters and policy objects.

use serde::Serialize;

use crate::element::Element;
use crate::error::Result;

/// Registry EPP server parameters (`<rdeEppParams:eppParams>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EppParams {
    /// Protocol version
    pub version: String,
    /// Language
    pub lang: String,
    /// Object namespace URIs
    pub obj_uris: Vec<String>,
    /// Extension namespace URIs from `<svcExtension>`
    pub ext_uris: Vec<String>,
}

impl EppParams {
    /// Builds EPP parameters from the decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            version: el.child_text("version"),
            lang: el.child_text("lang"),
            obj_uris: el.children_text("objURI"),
            ext_uris: el
                .child("svcExtension")
                .map(|ext| ext.children_text("extURI"))
                .unwrap_or_default(),
        })
    }

    /// Object and extension URIs as one space separated value.
    pub fn uri_list(&self) -> String {
        self.obj_uris
            .iter()
            .chain(self.ext_uris.iter())
            .map(|u| u.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A data policy entry (`<rdePolicy:policy scope=".." element=".."/>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// XPath scope of the policy
    pub scope: String,
    /// Element the policy makes mandatory
    pub element: String,
}

impl Policy {
    /// Builds a policy from the decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        Ok(Self {
            scope: el.attr_or_empty("scope"),
            element: el.attr_or_empty("element"),
        })
    }
}
