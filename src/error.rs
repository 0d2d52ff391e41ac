//! Error types for the RDE analyzer.
//!
//! Reconciliation discrepancies are not errors: they are collected as plain
//! messages in the analysis report. Everything here aborts the run.

use thiserror::Error;

/// Errors that can occur while analyzing an escrow deposit.
#[derive(Error, Debug)]
pub enum Error {
    /// Deposit file name does not end in `.xml`
    #[error("invalid deposit file name '{0}', must end with .xml")]
    InvalidFileName(String),

    /// Deposit type is neither FULL nor DIFF
    #[error("invalid deposit type '{0}', only FULL or DIFF are allowed")]
    InvalidDepositType(String),

    /// The stream ended before a `<rde:deposit>` element was seen
    #[error("reached end of input before finding a <rde:deposit> start element")]
    DepositNotFound,

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute parsing error
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// A matched element could not be decoded into its typed form
    #[error("error decoding {element}: {message}")]
    Decode {
        /// Local name of the element being decoded
        element: String,
        /// What went wrong
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl Error {
    /// Builds a [`Error::Decode`] for the named element.
    pub fn decode(element: impl Into<String>, message: impl ToString) -> Self {
        Error::Decode {
            element: element.into(),
            message: message.to_string(),
        }
    }

    /// Returns true for malformed-input failures (as opposed to I/O or
    /// configuration failures).
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Error::XmlParse(_) | Error::XmlAttribute(_) | Error::Decode { .. } | Error::Utf8(_)
        )
    }
}

/// Result type alias for analyzer operations.
pub type Result<T> = std::result::Result<T, Error>;
