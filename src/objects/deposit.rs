//! The `<rde:deposit>` envelope.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::element::parse_int;
use crate::error::{Error, Result};

/// Kind of deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DepositType {
    /// Complete snapshot
    #[serde(rename = "FULL")]
    Full,
    /// Changes since the previous deposit
    #[serde(rename = "DIFF")]
    Diff,
}

impl DepositType {
    /// Returns the attribute value for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DepositType::Full => "FULL",
            DepositType::Diff => "DIFF",
        }
    }
}

impl FromStr for DepositType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "FULL" => Ok(DepositType::Full),
            "DIFF" => Ok(DepositType::Diff),
            _ => Err(Error::InvalidDepositType(s.to_string())),
        }
    }
}

impl fmt::Display for DepositType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifying attributes of a deposit envelope.
///
/// The type is kept as the raw attribute text when read from a file, since
/// the analyzer reports what the deposit says rather than rejecting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    /// `type` attribute
    #[serde(rename = "type")]
    pub deposit_type: String,
    /// `id` attribute
    pub id: String,
    /// `prevId` attribute
    pub prev_id: String,
    /// `resend` attribute
    pub resend: i64,
    /// Text of `<rde:watermark>`
    pub watermark: String,
}

impl Deposit {
    /// Creates a new envelope for writing.
    ///
    /// The type must be FULL or DIFF (any case); it is stored upper-cased.
    /// The watermark is rendered as RFC 3339 with second precision.
    pub fn new(
        deposit_type: &str,
        id: impl Into<String>,
        prev_id: impl Into<String>,
        resend: i64,
        watermark: DateTime<Utc>,
    ) -> Result<Self> {
        let deposit_type: DepositType = deposit_type.parse()?;
        Ok(Self {
            deposit_type: deposit_type.as_str().to_string(),
            id: id.into(),
            prev_id: prev_id.into(),
            resend,
            watermark: watermark.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }

    /// Applies the envelope attributes read from a deposit start tag.
    pub(crate) fn apply_attrs(&mut self, attrs: &[(String, String)]) -> Result<()> {
        for (key, value) in attrs {
            match key.as_str() {
                "type" => self.deposit_type = value.clone(),
                "id" => self.id = value.clone(),
                "prevId" => self.prev_id = value.clone(),
                "resend" => self.resend = parse_int("deposit", value)?,
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deposit_type_from_str() {
        assert_eq!("full".parse::<DepositType>().unwrap(), DepositType::Full);
        assert_eq!("DIFF".parse::<DepositType>().unwrap(), DepositType::Diff);
        assert!("".parse::<DepositType>().is_err());
        assert!("INCR".parse::<DepositType>().is_err());
    }

    #[test]
    fn test_new_deposit() {
        let watermark = Utc.with_ymd_and_hms(2019, 10, 17, 0, 0, 0).unwrap();
        let dep = Deposit::new("full", "123", "456", 1, watermark).unwrap();
        assert_eq!(dep.deposit_type, "FULL");
        assert_eq!(dep.id, "123");
        assert_eq!(dep.prev_id, "456");
        assert_eq!(dep.resend, 1);
        assert_eq!(dep.watermark, "2019-10-17T00:00:00Z");
    }

    #[test]
    fn test_new_deposit_invalid_type() {
        let err = Deposit::new("", "123", "456", 0, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidDepositType(_)));
    }

    #[test]
    fn test_apply_attrs() {
        let mut dep = Deposit::default();
        dep.apply_attrs(&[
            ("type".to_string(), "DIFF".to_string()),
            ("id".to_string(), "20191017001".to_string()),
            ("resend".to_string(), "2".to_string()),
        ])
        .unwrap();
        assert_eq!(dep.deposit_type, "DIFF");
        assert_eq!(dep.id, "20191017001");
        assert_eq!(dep.resend, 2);

        let bad = [("resend".to_string(), "x".to_string())];
        assert!(dep.apply_attrs(&bad).is_err());
    }
}
