//! Owned element subtrees.
//!
//! The reader decodes one matched top-level object at a time into an
//! [`Element`] tree. Typed objects are then built from the tree with the
//! lookup helpers here. Child lookups go by local name only, since escrow
//! objects freely mix prefixes (`rdeContact:postalInfo` holding
//! `contact:addr`, `rdeDomain:ns` holding `domain:hostObj`).

use crate::error::{Error, Result};

/// A decoded XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name (prefix stripped)
    pub name: String,
    /// Resolved namespace URI, or the raw prefix when it was never declared
    pub namespace: Option<String>,
    /// Attributes as (local name, unescaped value); namespace declarations excluded
    pub attrs: Vec<(String, String)>,
    /// Concatenated character data directly under this element
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Creates an empty element with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the value of the attribute with the given local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the attribute value, or an empty string when absent.
    pub fn attr_or_empty(&self, name: &str) -> String {
        self.attr(name).unwrap_or_default().to_string()
    }

    /// Returns the first direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Iterates over the direct children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the text of the first child with the given name, or an empty
    /// string if there is no such child.
    pub fn child_text(&self, name: &str) -> String {
        self.child(name).map(|c| c.text.clone()).unwrap_or_default()
    }

    /// Collects the text of every direct child with the given name.
    pub fn children_text(&self, name: &str) -> Vec<String> {
        self.children_named(name).map(|c| c.text.clone()).collect()
    }

    /// Parses the text of a child as an integer. A missing or blank child
    /// yields 0.
    pub fn child_int(&self, name: &str) -> Result<i64> {
        match self.child(name) {
            Some(c) => c.int_text(),
            None => Ok(0),
        }
    }

    /// Parses this element's own text as an integer (blank yields 0).
    pub fn int_text(&self) -> Result<i64> {
        parse_int(&self.name, &self.text)
    }
}

/// Parses a trimmed integer field; blank is 0.
pub(crate) fn parse_int(element: &str, text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i64>()
        .map_err(|e| Error::decode(element, format!("invalid integer '{}': {}", trimmed, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, text: &str) -> Element {
        Element {
            text: text.to_string(),
            ..Element::new(name)
        }
    }

    #[test]
    fn test_child_lookup() {
        let mut el = Element::new("ns");
        el.children.push(leaf("hostObj", "ns1.example.com"));
        el.children.push(leaf("hostObj", "ns2.example.com"));
        el.children.push(leaf("other", "x"));

        assert_eq!(el.child_text("hostObj"), "ns1.example.com");
        assert_eq!(
            el.children_text("hostObj"),
            vec!["ns1.example.com", "ns2.example.com"]
        );
        assert_eq!(el.child_text("missing"), "");
    }

    #[test]
    fn test_child_int() {
        let mut el = Element::new("dsData");
        el.children.push(leaf("keyTag", " 12345\n "));
        el.children.push(leaf("alg", ""));
        el.children.push(leaf("digestType", "two"));

        assert_eq!(el.child_int("keyTag").unwrap(), 12345);
        assert_eq!(el.child_int("alg").unwrap(), 0);
        assert_eq!(el.child_int("missing").unwrap(), 0);
        assert!(el.child_int("digestType").is_err());
    }

    #[test]
    fn test_attr() {
        let mut el = Element::new("status");
        el.attrs.push(("s".to_string(), "ok".to_string()));
        assert_eq!(el.attr("s"), Some("ok"));
        assert_eq!(el.attr_or_empty("lang"), "");
    }
}
