//! Deposit envelope writer.
//!
//! Produces the `<rde:deposit>` envelope for a new escrow deposit: the
//! identifying attributes, every namespace declaration, the watermark and,
//! optionally, a header with the declared object counts.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use ryde_rs::objects::{Deposit, Header, HeaderCount, XMLNS_RDE_DOMAIN};
//! use ryde_rs::writer::EnvelopeWriter;
//!
//! let deposit = Deposit::new("full", "20191017001", "", 0, Utc::now()).unwrap();
//! let header = Header {
//!     tld: "example".to_string(),
//!     registrar: 1,
//!     ppsp: 0,
//!     counts: vec![HeaderCount {
//!         uri: XMLNS_RDE_DOMAIN.to_string(),
//!         count: 2,
//!     }],
//! };
//!
//! let xml = EnvelopeWriter::new()
//!     .write_to_string(&deposit, Some(&header))
//!     .unwrap();
//! assert!(xml.contains(r#"type="FULL""#));
//! ```

use crate::error::Result;
use crate::objects::{Deposit, Header, NAMESPACES};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Configuration options for the envelope writer.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Whether to indent the output for readability
    pub indent: bool,
    /// Number of spaces per indentation level
    pub indent_size: usize,
    /// Whether to include the XML declaration
    pub xml_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: true,
            indent_size: 2,
            xml_declaration: true,
        }
    }
}

impl WriterConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-line output without a declaration.
    pub fn compact() -> Self {
        Self {
            indent: false,
            indent_size: 0,
            xml_declaration: false,
        }
    }

    /// Sets whether to indent the output.
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Sets whether to emit the XML declaration.
    pub fn with_xml_declaration(mut self, xml_declaration: bool) -> Self {
        self.xml_declaration = xml_declaration;
        self
    }
}

/// Writes deposit envelopes.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeWriter {
    config: WriterConfig,
}

impl EnvelopeWriter {
    /// Creates a new writer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new writer with the specified configuration.
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Writes the envelope to a string.
    pub fn write_to_string(&self, deposit: &Deposit, header: Option<&Header>) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(deposit, header, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Writes the envelope to any `Write` implementation.
    pub fn write<W: Write>(
        &self,
        deposit: &Deposit,
        header: Option<&Header>,
        writer: W,
    ) -> Result<()> {
        let mut xml_writer = if self.config.indent {
            Writer::new_with_indent(writer, b' ', self.config.indent_size)
        } else {
            Writer::new(writer)
        };

        if self.config.xml_declaration {
            xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
            if self.config.indent {
                xml_writer.get_mut().write_all(b"\n")?;
            }
        }

        let resend = deposit.resend.to_string();
        let mut start = BytesStart::new("rde:deposit");
        start.push_attribute(("type", deposit.deposit_type.as_str()));
        start.push_attribute(("id", deposit.id.as_str()));
        start.push_attribute(("prevId", deposit.prev_id.as_str()));
        start.push_attribute(("resend", resend.as_str()));
        for (prefix, uri) in NAMESPACES {
            let key = format!("xmlns:{}", prefix);
            start.push_attribute((key.as_str(), *uri));
        }
        xml_writer.write_event(Event::Start(start))?;

        write_simple_element(&mut xml_writer, "rde:watermark", &deposit.watermark)?;

        if let Some(header) = header {
            xml_writer.write_event(Event::Start(BytesStart::new("rde:contents")))?;
            write_header(&mut xml_writer, header)?;
            xml_writer.write_event(Event::End(BytesEnd::new("rde:contents")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("rde:deposit")))?;
        Ok(())
    }
}

fn write_header<W: Write>(writer: &mut Writer<W>, header: &Header) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("rdeHeader:header")))?;
    write_simple_element(writer, "rdeHeader:tld", &header.tld)?;
    write_simple_element(writer, "rdeHeader:registrar", &header.registrar.to_string())?;
    write_simple_element(writer, "rdeHeader:ppsp", &header.ppsp.to_string())?;
    for count in &header.counts {
        let mut start = BytesStart::new("rdeHeader:count");
        start.push_attribute(("uri", count.uri.as_str()));
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Text(BytesText::new(&count.count.to_string())))?;
        writer.write_event(Event::End(BytesEnd::new("rdeHeader:count")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("rdeHeader:header")))?;
    Ok(())
}

fn write_simple_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Convenience function to write an envelope to a string.
pub fn to_string(deposit: &Deposit, header: Option<&Header>) -> Result<String> {
    EnvelopeWriter::new().write_to_string(deposit, header)
}
