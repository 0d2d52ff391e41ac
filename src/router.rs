//! Tag routing: which start tags are objects, and of what kind.

use std::fmt;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::objects::{
    Contact, Domain, EppParams, Header, Host, IdnTableReference, Nndn, Policy, Registrar,
    XMLNS_RDE_CONTACT, XMLNS_RDE_DOMAIN, XMLNS_RDE_EPP_PARAMS, XMLNS_RDE_HEADER, XMLNS_RDE_HOST,
    XMLNS_RDE_IDN, XMLNS_RDE_NNDN, XMLNS_RDE_POLICY, XMLNS_RDE_REGISTRAR,
};
use crate::reader::StartTag;

/// The kinds of top-level object the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// `<rdeHeader:header>`
    Header,
    /// `<rdeRegistrar:registrar>`
    Registrar,
    /// `<rdeContact:contact>`
    Contact,
    /// `<rdeDomain:domain>`
    Domain,
    /// `<rdeHost:host>`
    Host,
    /// `<rdeIDN:idnTableRef>`
    IdnTableRef,
    /// `<rdeNNDN:NNDN>`
    Nndn,
    /// `<rdeEppParams:eppParams>`
    EppParams,
    /// `<rdePolicy:policy>`
    Policy,
}

/// Routing table: local name, kind and the namespace the element must be in.
pub const ROUTES: &[(&str, ObjectKind, &str)] = &[
    ("header", ObjectKind::Header, XMLNS_RDE_HEADER),
    ("registrar", ObjectKind::Registrar, XMLNS_RDE_REGISTRAR),
    ("contact", ObjectKind::Contact, XMLNS_RDE_CONTACT),
    ("domain", ObjectKind::Domain, XMLNS_RDE_DOMAIN),
    ("host", ObjectKind::Host, XMLNS_RDE_HOST),
    ("idnTableRef", ObjectKind::IdnTableRef, XMLNS_RDE_IDN),
    ("NNDN", ObjectKind::Nndn, XMLNS_RDE_NNDN),
    ("eppParams", ObjectKind::EppParams, XMLNS_RDE_EPP_PARAMS),
    ("policy", ObjectKind::Policy, XMLNS_RDE_POLICY),
];

impl ObjectKind {
    /// Local element name of this kind.
    pub fn local_name(self) -> &'static str {
        match self {
            ObjectKind::Header => "header",
            ObjectKind::Registrar => "registrar",
            ObjectKind::Contact => "contact",
            ObjectKind::Domain => "domain",
            ObjectKind::Host => "host",
            ObjectKind::IdnTableRef => "idnTableRef",
            ObjectKind::Nndn => "NNDN",
            ObjectKind::EppParams => "eppParams",
            ObjectKind::Policy => "policy",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// What to do with a start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// A recognized object in its expected namespace: decode it
    Object(ObjectKind),
    /// A recognized name in some other namespace: skip the whole element
    Mismatch(ObjectKind),
    /// Not an object: keep reading into it
    Ignore,
}

/// Routes a start tag by local name, then checks its namespace.
pub fn resolve(tag: &StartTag) -> Route {
    match ROUTES.iter().find(|(name, _, _)| *name == tag.local_name) {
        Some(&(_, kind, uri)) if tag.in_namespace(uri) => Route::Object(kind),
        Some(&(_, kind, _)) => Route::Mismatch(kind),
        None => Route::Ignore,
    }
}

/// A decoded top-level object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositObject {
    /// Deposit header
    Header(Header),
    /// Registrar
    Registrar(Registrar),
    /// Contact
    Contact(Contact),
    /// Domain
    Domain(Domain),
    /// Host
    Host(Host),
    /// IDN table reference
    IdnTableRef(IdnTableReference),
    /// Non-delegated name
    Nndn(Nndn),
    /// EPP parameters
    EppParams(EppParams),
    /// Policy
    Policy(Policy),
}

impl DepositObject {
    /// Builds the typed object for `kind` from its element tree.
    pub fn decode(kind: ObjectKind, el: &Element) -> Result<Self> {
        let object = match kind {
            ObjectKind::Header => Header::from_element(el).map(DepositObject::Header),
            ObjectKind::Registrar => Registrar::from_element(el).map(DepositObject::Registrar),
            ObjectKind::Contact => Contact::from_element(el).map(DepositObject::Contact),
            ObjectKind::Domain => Domain::from_element(el).map(DepositObject::Domain),
            ObjectKind::Host => Host::from_element(el).map(DepositObject::Host),
            ObjectKind::IdnTableRef => {
                IdnTableReference::from_element(el).map(DepositObject::IdnTableRef)
            }
            ObjectKind::Nndn => Nndn::from_element(el).map(DepositObject::Nndn),
            ObjectKind::EppParams => EppParams::from_element(el).map(DepositObject::EppParams),
            ObjectKind::Policy => Policy::from_element(el).map(DepositObject::Policy),
        };
        object.map_err(|e| match e {
            Error::Decode { .. } => e,
            other => Error::decode(kind.local_name(), other),
        })
    }

    /// Kind of this object.
    pub fn kind(&self) -> ObjectKind {
        match self {
            DepositObject::Header(_) => ObjectKind::Header,
            DepositObject::Registrar(_) => ObjectKind::Registrar,
            DepositObject::Contact(_) => ObjectKind::Contact,
            DepositObject::Domain(_) => ObjectKind::Domain,
            DepositObject::Host(_) => ObjectKind::Host,
            DepositObject::IdnTableRef(_) => ObjectKind::IdnTableRef,
            DepositObject::Nndn(_) => ObjectKind::Nndn,
            DepositObject::EppParams(_) => ObjectKind::EppParams,
            DepositObject::Policy(_) => ObjectKind::Policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::XMLNS_DOMAIN;
    use crate::reader::DepositReader;
    use std::io::Cursor;

    fn first_tag(xml: &str) -> StartTag {
        let mut reader = DepositReader::from_reader(Cursor::new(xml.as_bytes()));
        reader.next_start().unwrap().unwrap()
    }

    #[test]
    fn test_resolve_object() {
        let tag = first_tag(&format!(
            r#"<rdeDomain:domain xmlns:rdeDomain="{}"/>"#,
            XMLNS_RDE_DOMAIN
        ));
        assert_eq!(resolve(&tag), Route::Object(ObjectKind::Domain));

        let tag = first_tag(&format!(r#"<NNDN xmlns="{}"/>"#, XMLNS_RDE_NNDN));
        assert_eq!(resolve(&tag), Route::Object(ObjectKind::Nndn));
    }

    #[test]
    fn test_resolve_namespace_mismatch() {
        // An EPP domain element is not an escrow domain.
        let tag = first_tag(&format!(
            r#"<domain:domain xmlns:domain="{}"/>"#,
            XMLNS_DOMAIN
        ));
        assert_eq!(resolve(&tag), Route::Mismatch(ObjectKind::Domain));

        let tag = first_tag("<host/>");
        assert_eq!(resolve(&tag), Route::Mismatch(ObjectKind::Host));
    }

    #[test]
    fn test_resolve_ignores_unknown_names() {
        let tag = first_tag(r#"<rde:contents xmlns:rde="urn:ietf:params:xml:ns:rde-1.0"/>"#);
        assert_eq!(resolve(&tag), Route::Ignore);
        // Routing is case sensitive.
        assert_eq!(resolve(&first_tag("<nndn/>")), Route::Ignore);
    }

    #[test]
    fn test_routes_match_kind_names() {
        for (name, kind, _) in ROUTES {
            assert_eq!(*name, kind.local_name());
        }
    }

    #[test]
    fn test_decode_wraps_errors_with_kind() {
        let mut el = Element::new("registrar");
        let mut gurid = Element::new("gurid");
        gurid.text = "eight".to_string();
        el.children.push(gurid);

        let err = DepositObject::decode(ObjectKind::Registrar, &el).unwrap_err();
        assert!(err.is_decode_error());

        let mut el = Element::new("policy");
        el.attrs.push(("scope".to_string(), "//rde:deposit".to_string()));
        let object = DepositObject::decode(ObjectKind::Policy, &el).unwrap();
        assert_eq!(object.kind(), ObjectKind::Policy);
    }
}
