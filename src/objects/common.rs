//! Namespaces and shared building blocks of escrow objects.
//!
//! - [`NAMESPACES`] - prefix to URI table used by routing, validation and the
//!   envelope writer
//! - [`PostalInfo`] and [`Address`] - shared by contacts and registrars
//! - [`statuses`] - the `<status s="..."/>` lists found on most objects

use serde::Serialize;

use crate::element::Element;

// ============================================================================
// RDE Namespaces
// ============================================================================

/// EPP domain mapping namespace
pub const XMLNS_DOMAIN: &str = "urn:ietf:params:xml:ns:domain-1.0";
/// EPP contact mapping namespace
pub const XMLNS_CONTACT: &str = "urn:ietf:params:xml:ns:contact-1.0";
/// DNSSEC extension namespace
pub const XMLNS_SECDNS: &str = "urn:ietf:params:xml:ns:secDNS-1.1";
/// Escrow envelope namespace
pub const XMLNS_RDE: &str = "urn:ietf:params:xml:ns:rde-1.0";
/// Deposit header namespace
pub const XMLNS_RDE_HEADER: &str = "urn:ietf:params:xml:ns:rdeHeader-1.0";
/// Domain object namespace
pub const XMLNS_RDE_DOMAIN: &str = "urn:ietf:params:xml:ns:rdeDomain-1.0";
/// Host object namespace
pub const XMLNS_RDE_HOST: &str = "urn:ietf:params:xml:ns:rdeHost-1.0";
/// Contact object namespace
pub const XMLNS_RDE_CONTACT: &str = "urn:ietf:params:xml:ns:rdeContact-1.0";
/// Registrar object namespace
pub const XMLNS_RDE_REGISTRAR: &str = "urn:ietf:params:xml:ns:rdeRegistrar-1.0";
/// IDN table reference namespace
pub const XMLNS_RDE_IDN: &str = "urn:ietf:params:xml:ns:rdeIDN-1.0";
/// NNDN object namespace
pub const XMLNS_RDE_NNDN: &str = "urn:ietf:params:xml:ns:rdeNNDN-1.0";
/// EPP parameters namespace
pub const XMLNS_RDE_EPP_PARAMS: &str = "urn:ietf:params:xml:ns:rdeEppParams-1.0";
/// Policy object namespace
pub const XMLNS_RDE_POLICY: &str = "urn:ietf:params:xml:ns:rdePolicy-1.0";
/// EPP base namespace
pub const XMLNS_EPP: &str = "urn:ietf:params:xml:ns:epp-1.0";

/// Prefix to namespace URI table, in the order the envelope declares them.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("domain", XMLNS_DOMAIN),
    ("contact", XMLNS_CONTACT),
    ("secDNS", XMLNS_SECDNS),
    ("rde", XMLNS_RDE),
    ("rdeHeader", XMLNS_RDE_HEADER),
    ("rdeDomain", XMLNS_RDE_DOMAIN),
    ("rdeHost", XMLNS_RDE_HOST),
    ("rdeContact", XMLNS_RDE_CONTACT),
    ("rdeRegistrar", XMLNS_RDE_REGISTRAR),
    ("rdeIDN", XMLNS_RDE_IDN),
    ("rdeNNDN", XMLNS_RDE_NNDN),
    ("rdeEppParams", XMLNS_RDE_EPP_PARAMS),
    ("rdePolicy", XMLNS_RDE_POLICY),
    ("epp", XMLNS_EPP),
];

// ============================================================================
// Postal info
// ============================================================================

/// A postal address (`<addr>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street lines, normally 0 to 3
    pub street: Vec<String>,
    /// City
    pub city: String,
    /// State or province
    pub state_province: String,
    /// Postal code
    pub postal_code: String,
    /// Country code
    pub country_code: String,
}

impl Address {
    /// Builds an address from an `<addr>` element.
    pub fn from_element(el: &Element) -> Self {
        Self {
            street: el.children_text("street"),
            city: el.child_text("city"),
            state_province: el.child_text("sp"),
            postal_code: el.child_text("pc"),
            country_code: el.child_text("cc"),
        }
    }
}

/// A `<postalInfo>` record. Registrar postal info carries no name or org;
/// those fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalInfo {
    /// `type` attribute (`int` or `loc`)
    pub postal_type: String,
    /// Contact name
    pub name: String,
    /// Contact organization
    pub org: String,
    /// Postal address
    pub address: Address,
}

impl PostalInfo {
    /// Builds postal info from a `<postalInfo>` element.
    pub fn from_element(el: &Element) -> Self {
        Self {
            postal_type: el.attr_or_empty("type"),
            name: el.child_text("name"),
            org: el.child_text("org"),
            address: el.child("addr").map(Address::from_element).unwrap_or_default(),
        }
    }
}

/// Collects the `s` attribute of every `<status>` child.
pub fn statuses(el: &Element) -> Vec<String> {
    el.children_named("status")
        .map(|s| s.attr_or_empty("s"))
        .collect()
}

/// Pads street lines with empty strings until the row reaches `threshold`
/// fields, then appends city, state/province, postal code and country code.
///
/// `row` holds the leading fields (ids, type, ...) on entry. With the
/// threshold set to leading fields + 2, a row with 0 to 3 street lines always
/// ends up with exactly 3 street columns.
pub fn push_street_padded(row: &mut Vec<String>, address: &Address, threshold: usize) {
    row.extend(address.street.iter().cloned());
    while row.len() <= threshold {
        row.push(String::new());
    }
    row.push(address.city.clone());
    row.push(address.state_province.clone());
    row.push(address.postal_code.clone());
    row.push(address.country_code.clone());
}
