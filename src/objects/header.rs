//! Deposit header (`<rdeHeader:header>`): the declared object counts.

use serde::Serialize;

use crate::element::Element;
use crate::error::Result;
use crate::normalize::standardize;

/// The declared number of objects for one namespace URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderCount {
    /// Object namespace URI the count applies to
    #[serde(rename = "object")]
    pub uri: String,
    /// Declared object count
    pub count: i64,
}

/// A decoded deposit header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Top level domain the deposit covers
    pub tld: String,
    /// Declared registrar count
    pub registrar: i64,
    /// Declared policy/parameter count
    pub ppsp: i64,
    /// Per-namespace declared counts, in document order
    #[serde(rename = "count")]
    pub counts: Vec<HeaderCount>,
}

impl Header {
    /// Builds a header from its decoded element.
    pub fn from_element(el: &Element) -> Result<Self> {
        let counts = el
            .children_named("count")
            .map(|c| {
                Ok(HeaderCount {
                    uri: c.attr_or_empty("uri"),
                    count: c.int_text()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tld: standardize(&el.child_text("tld")),
            registrar: el.child_int("registrar")?,
            ppsp: el.child_int("ppsp")?,
            counts,
        })
    }

    /// Returns the declared count for a namespace URI, if the header lists it.
    pub fn count_for(&self, uri: &str) -> Option<i64> {
        self.counts.iter().find(|c| c.uri == uri).map(|c| c.count)
    }
}
