//! Streaming deposit reader.
//!
//! This module wraps `quick-xml`'s namespace-aware reader. It reads the
//! deposit strictly forward, exposing start tags one at a time; the caller
//! decides per tag whether to decode the element into an owned
//! [`Element`] subtree, skip it, or descend into it.
//!
//! # Example
//!
//! ```rust,no_run
//! use ryde_rs::reader::DepositReader;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("deposit.xml").unwrap();
//! let mut reader = DepositReader::from_reader(BufReader::new(file));
//!
//! while let Some(tag) = reader.next_start().unwrap() {
//!     if tag.local_name == "domain" {
//!         let element = reader.decode_element(&tag).unwrap();
//!         println!("{}", element.child_text("name"));
//!     }
//! }
//! ```

use crate::element::Element;
use crate::error::{Error, Result};
use crate::normalize::standardize;
use crate::objects::{Deposit, XMLNS_RDE};
use quick_xml::events::BytesStart;
use quick_xml::events::Event as XmlEvent;
use quick_xml::name::{Namespace, QName, ResolveResult};
use quick_xml::NsReader;
use std::io::BufRead;
use std::str;

/// An element start as seen in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Local name (prefix stripped)
    pub local_name: String,
    /// Resolved namespace URI; an undeclared prefix is kept verbatim
    pub namespace: Option<String>,
    /// Attributes as (local name, value), namespace declarations excluded
    pub attrs: Vec<(String, String)>,
    qname: Vec<u8>,
    empty: bool,
}

impl StartTag {
    /// Returns true for a self-closing tag (`<x/>`), which has no content.
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Returns true when the tag's namespace is exactly `uri`.
    pub fn in_namespace(&self, uri: &str) -> bool {
        self.namespace.as_deref() == Some(uri)
    }

    fn from_bytes(ns: &ResolveResult<'_>, e: &BytesStart<'_>, empty: bool) -> Result<Self> {
        let local_name = str::from_utf8(e.local_name().as_ref())?.to_string();
        let namespace = match ns {
            ResolveResult::Bound(Namespace(uri)) => Some(str::from_utf8(uri)?.to_string()),
            ResolveResult::Unbound => None,
            ResolveResult::Unknown(prefix) => Some(str::from_utf8(prefix)?.to_string()),
        };
        Ok(Self {
            local_name,
            namespace,
            attrs: extract_attrs(e)?,
            qname: e.name().as_ref().to_vec(),
            empty,
        })
    }

    fn into_element(self) -> Element {
        Element {
            name: self.local_name,
            namespace: self.namespace,
            attrs: self.attrs,
            ..Element::default()
        }
    }
}

/// Extracts attributes from a start tag as owned data.
fn extract_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = str::from_utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr.unescape_value()?.to_string();
        attrs.push((key, value));
    }
    Ok(attrs)
}

/// Intermediate parsed event data (owned, to avoid borrow conflicts).
enum ParsedEvent {
    Start(StartTag),
    End,
    Text(String),
    Eof,
    Other,
}

/// A forward-only reader over an escrow deposit.
///
/// Reads from any `BufRead` source. Only the element currently being
/// decoded is held in memory, so deposits of any size can be processed.
pub struct DepositReader<R: BufRead> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> DepositReader<R> {
    /// Creates a new deposit reader from a buffered reader.
    pub fn from_reader(reader: R) -> Self {
        // Text is kept verbatim; fields are normalized when rows are written.
        Self {
            reader: NsReader::from_reader(reader),
            buf: Vec::with_capacity(8192),
            done: false,
        }
    }

    /// Reads the next raw event and converts it to owned data.
    fn read_next(&mut self) -> Result<ParsedEvent> {
        self.buf.clear();
        let (ns, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
        let parsed = match event {
            XmlEvent::Start(ref e) => ParsedEvent::Start(StartTag::from_bytes(&ns, e, false)?),
            XmlEvent::Empty(ref e) => ParsedEvent::Start(StartTag::from_bytes(&ns, e, true)?),
            XmlEvent::End(_) => ParsedEvent::End,
            XmlEvent::Text(ref e) => ParsedEvent::Text(e.unescape()?.to_string()),
            XmlEvent::CData(ref e) => ParsedEvent::Text(str::from_utf8(e.as_ref())?.to_string()),
            XmlEvent::Eof => ParsedEvent::Eof,
            _ => ParsedEvent::Other,
        };
        Ok(parsed)
    }

    /// Advances to the next element start anywhere in the document.
    ///
    /// Returns `Ok(None)` at end of input. Descends into every element the
    /// caller neither decodes nor skips.
    pub fn next_start(&mut self) -> Result<Option<StartTag>> {
        if self.done {
            return Ok(None);
        }
        loop {
            match self.read_next()? {
                ParsedEvent::Start(tag) => return Ok(Some(tag)),
                ParsedEvent::Eof => {
                    self.done = true;
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    /// Decodes the element opened by `start` (the tag just returned by
    /// [`next_start`](Self::next_start)) into an owned subtree, consuming
    /// the stream up to and including its end tag.
    pub fn decode_element(&mut self, start: &StartTag) -> Result<Element> {
        let root = start.clone().into_element();
        if start.is_empty() {
            return Ok(root);
        }

        let mut stack = vec![root];
        loop {
            match self.read_next()? {
                ParsedEvent::Start(tag) => {
                    let empty = tag.is_empty();
                    let el = tag.into_element();
                    if empty {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(el);
                        }
                    } else {
                        stack.push(el);
                    }
                }
                ParsedEvent::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                ParsedEvent::End => {
                    let Some(done) = stack.pop() else {
                        return Err(Error::decode(&start.local_name, "unbalanced end tag"));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => return Ok(done),
                    }
                }
                ParsedEvent::Eof => {
                    self.done = true;
                    return Err(Error::decode(
                        &start.local_name,
                        "unexpected end of input before closing tag",
                    ));
                }
                ParsedEvent::Other => {}
            }
        }
    }

    /// Skips the element opened by `start` without building anything.
    pub fn skip_element(&mut self, start: &StartTag) -> Result<()> {
        if start.is_empty() {
            return Ok(());
        }
        self.buf.clear();
        self.reader
            .read_to_end_into(QName(&start.qname), &mut self.buf)?;
        Ok(())
    }

    /// Finds the first `<rde:deposit>` element and reads its attributes and
    /// watermark.
    ///
    /// Stops as soon as the watermark has been read (or the contents begin),
    /// so the body of the deposit is never decoded. Returns
    /// [`Error::DepositNotFound`] when the input ends first.
    pub fn read_deposit(&mut self) -> Result<Deposit> {
        let start = loop {
            match self.next_start()? {
                Some(tag) if tag.local_name == "deposit" && tag.in_namespace(XMLNS_RDE) => {
                    break tag
                }
                Some(_) => {}
                None => return Err(Error::DepositNotFound),
            }
        };

        let mut deposit = Deposit::default();
        deposit.apply_attrs(&start.attrs)?;
        if start.is_empty() {
            return Ok(deposit);
        }

        let mut depth = 0usize;
        loop {
            match self.read_next()? {
                ParsedEvent::Start(tag) if depth == 0 && tag.local_name == "watermark" => {
                    deposit.watermark = standardize(&self.decode_element(&tag)?.text);
                    return Ok(deposit);
                }
                ParsedEvent::Start(tag) if depth == 0 && tag.local_name == "contents" => {
                    return Ok(deposit);
                }
                ParsedEvent::Start(tag) => {
                    if !tag.is_empty() {
                        depth += 1;
                    }
                }
                ParsedEvent::End => {
                    if depth == 0 {
                        return Ok(deposit);
                    }
                    depth -= 1;
                }
                ParsedEvent::Eof => {
                    self.done = true;
                    return Err(Error::decode(
                        "deposit",
                        "unexpected end of input before closing tag",
                    ));
                }
                ParsedEvent::Text(_) | ParsedEvent::Other => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SMALL_DEPOSIT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rde:deposit type="FULL" id="20191017001"
  xmlns:rde="urn:ietf:params:xml:ns:rde-1.0"
  xmlns:rdeDomain="urn:ietf:params:xml:ns:rdeDomain-1.0"
  xmlns:domain="urn:ietf:params:xml:ns:domain-1.0">
  <rde:watermark>2019-10-17T00:00:00Z</rde:watermark>
  <rde:contents>
    <rdeDomain:domain>
      <rdeDomain:name>example1.example</rdeDomain:name>
      <rdeDomain:status s="ok"/>
      <rdeDomain:ns>
        <domain:hostObj>ns1.example.com</domain:hostObj>
      </rdeDomain:ns>
      <!-- comment -->
      <rdeDomain:clID><![CDATA[RegistrarX]]></rdeDomain:clID>
    </rdeDomain:domain>
    <other/>
  </rde:contents>
</rde:deposit>"#;

    fn reader(xml: &str) -> DepositReader<Cursor<&str>> {
        DepositReader::from_reader(Cursor::new(xml))
    }

    #[test]
    fn test_read_deposit() {
        let dep = reader(SMALL_DEPOSIT).read_deposit().unwrap();
        assert_eq!(dep.id, "20191017001");
        assert_eq!(dep.deposit_type, "FULL");
        assert_eq!(dep.watermark, "2019-10-17T00:00:00Z");
        assert_eq!(dep.resend, 0);
    }

    #[test]
    fn test_read_deposit_not_found() {
        let err = reader("<root><child/></root>").read_deposit().unwrap_err();
        assert!(matches!(err, Error::DepositNotFound));

        let err = reader("").read_deposit().unwrap_err();
        assert!(matches!(err, Error::DepositNotFound));
    }

    #[test]
    fn test_read_deposit_wrong_namespace_not_found() {
        let xml = r#"<x:deposit xmlns:x="urn:example" id="1"/>"#;
        let err = reader(xml).read_deposit().unwrap_err();
        assert!(matches!(err, Error::DepositNotFound));
    }

    #[test]
    fn test_next_start_namespaces() {
        let mut r = reader(SMALL_DEPOSIT);
        let mut seen = Vec::new();
        while let Some(tag) = r.next_start().unwrap() {
            seen.push((tag.local_name.clone(), tag.namespace.clone()));
        }
        assert_eq!(
            seen[0],
            ("deposit".to_string(), Some(XMLNS_RDE.to_string()))
        );
        assert!(seen.contains(&(
            "hostObj".to_string(),
            Some("urn:ietf:params:xml:ns:domain-1.0".to_string())
        )));
        assert!(seen.contains(&("other".to_string(), None)));
    }

    #[test]
    fn test_decode_element() {
        let mut r = reader(SMALL_DEPOSIT);
        let tag = loop {
            let tag = r.next_start().unwrap().unwrap();
            if tag.local_name == "domain" {
                break tag;
            }
        };
        let el = r.decode_element(&tag).unwrap();

        assert_eq!(el.name, "domain");
        assert_eq!(el.namespace.as_deref(), Some("urn:ietf:params:xml:ns:rdeDomain-1.0"));
        assert_eq!(el.child_text("name"), "example1.example");
        assert_eq!(el.child("status").unwrap().attr("s"), Some("ok"));
        assert_eq!(el.child("ns").unwrap().child_text("hostObj"), "ns1.example.com");
        assert_eq!(el.child_text("clID"), "RegistrarX");

        // The stream continues right after the decoded element
        let next = r.next_start().unwrap().unwrap();
        assert_eq!(next.local_name, "other");
        assert!(next.is_empty());
    }

    #[test]
    fn test_decode_text_around_comment_and_cdata() {
        let xml = "<c><name>John <!-- x --> Doe</name><org>Acme <![CDATA[Widgets]]> Inc</org></c>";
        let mut r = reader(xml);
        let tag = r.next_start().unwrap().unwrap();
        let el = r.decode_element(&tag).unwrap();

        assert_eq!(standardize(&el.child_text("name")), "John Doe");
        assert_eq!(standardize(&el.child_text("org")), "Acme Widgets Inc");
    }

    #[test]
    fn test_watermark_is_normalized() {
        let xml = r#"<rde:deposit xmlns:rde="urn:ietf:params:xml:ns:rde-1.0" type="FULL">
  <rde:watermark>
    2019-10-17T00:00:00Z
  </rde:watermark>
</rde:deposit>"#;
        let dep = reader(xml).read_deposit().unwrap();
        assert_eq!(dep.watermark, "2019-10-17T00:00:00Z");
    }

    #[test]
    fn test_skip_element() {
        let mut r = reader(SMALL_DEPOSIT);
        let tag = loop {
            let tag = r.next_start().unwrap().unwrap();
            if tag.local_name == "domain" {
                break tag;
            }
        };
        r.skip_element(&tag).unwrap();
        assert_eq!(r.next_start().unwrap().unwrap().local_name, "other");
        assert!(r.next_start().unwrap().is_none());
    }

    #[test]
    fn test_malformed_xml_is_decode_error() {
        let xml = r#"<rde:deposit xmlns:rde="urn:ietf:params:xml:ns:rde-1.0"><a></b></rde:deposit>"#;
        let mut r = reader(xml);
        let result: Result<Vec<StartTag>> =
            std::iter::from_fn(|| r.next_start().transpose()).collect();
        let err = result.unwrap_err();
        assert!(err.is_decode_error(), "{:?}", err);
    }

    #[test]
    fn test_truncated_element_is_decode_error() {
        let xml = r#"<domain><name>example.example</name>"#;
        let mut r = reader(xml);
        let tag = r.next_start().unwrap().unwrap();
        let err = r.decode_element(&tag).unwrap_err();
        assert!(err.is_decode_error(), "{:?}", err);
    }
}
