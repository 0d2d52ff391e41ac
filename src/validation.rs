//! Reconciliation of the written tables.
//!
//! After the main pass the table files are reopened read-only and checked
//! two ways:
//!
//! - Line counts against the in-memory counters and, where the rule says
//!   so, against the counts declared in the deposit header.
//! - Every record's field count against the table's fixed width.
//!
//! Mismatches are returned as messages. They never abort the run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::counters::Counters;
use crate::error::Result;
use crate::objects::Header;
use crate::tables::Table;

const LINE_BUFFER_SIZE: usize = 32 * 1024;

/// Counts `\n` bytes in a stream.
///
/// A final line without a trailing newline is not counted.
pub fn count_lines<R: Read>(mut reader: R) -> io::Result<usize> {
    let mut buffer = vec![0u8; LINE_BUFFER_SIZE];
    let mut count = 0;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => return Ok(count),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        count += memchr::memchr_iter(b'\n', &buffer[..read]).count();
    }
}

/// Size and line count of one written table file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvFileInfo {
    /// Path of the file
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    /// Number of `\n` terminated lines
    pub line_count: usize,
}

impl CsvFileInfo {
    /// Opens the file read-only and records its size and line count.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let line_count = count_lines(io::BufReader::new(file))?;
        Ok(Self {
            file_name: path.display().to_string(),
            file_size,
            line_count,
        })
    }
}

/// A count check for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRule {
    /// Table whose line count is checked
    pub table: Table,
    /// Namespace prefix whose header count applies to the table
    pub namespace_key: &'static str,
    /// Whether the line count must also equal the header's declared count
    pub match_header: bool,
}

const fn rule(table: Table, namespace_key: &'static str, match_header: bool) -> ValidationRule {
    ValidationRule {
        table,
        namespace_key,
        match_header,
    }
}

/// The checks run after every analysis, in reporting order.
pub const VALIDATION_RULES: &[ValidationRule] = &[
    rule(Table::Domain, "rdeDomain", true),
    rule(Table::Host, "rdeHost", true),
    rule(Table::Contact, "rdeContact", true),
    rule(Table::Registrar, "rdeRegistrar", true),
    rule(Table::IdnLanguage, "rdeIDN", true),
    rule(Table::Nndn, "rdeNNDN", true),
    rule(Table::EppParams, "rdeEppParams", true),
    rule(Table::DomainStatus, "rdeDomain", false),
    rule(Table::DomainNameservers, "rdeDomain", false),
    rule(Table::DomainDnssec, "rdeDomain", false),
    rule(Table::DomainTransfers, "rdeDomain", false),
    rule(Table::HostAddress, "rdeHost", false),
    rule(Table::HostStatus, "rdeHost", false),
    rule(Table::ContactStatus, "rdeContact", false),
    rule(Table::ContactPostalInfo, "rdeContact", false),
    rule(Table::RegistrarPostalInfo, "rdeRegistrar", false),
    rule(Table::UniqueContactId, "rdeContact", false),
    rule(Table::Policy, "rdePolicy", true),
];

/// Compares line counts with the counters and the header.
///
/// Every rule checks the table's line count against its counter. Rules with
/// `match_header` also check it against each header count whose URI is the
/// rule's namespace. Tables missing from `files` are treated as empty.
pub fn check_counts(
    config: &AnalyzerConfig,
    files: &BTreeMap<Table, CsvFileInfo>,
    counters: &Counters,
    header: Option<&Header>,
) -> Vec<String> {
    let mut errors = Vec::new();
    for rule in config.validation_rules {
        let lines = files.get(&rule.table).map_or(0, |f| f.line_count);
        let expected = counters.get(rule.table);
        if lines as u64 != expected {
            errors.push(format!(
                "CSV file {} has {} lines, expected {}",
                rule.table, lines, expected
            ));
        }

        if !rule.match_header {
            continue;
        }
        let (Some(header), Some(uri)) = (header, config.namespace(rule.namespace_key)) else {
            continue;
        };
        for declared in header.counts.iter().filter(|c| c.uri == uri) {
            if declared.count != lines as i64 {
                errors.push(format!(
                    "CSV file {} has {} lines, header says {} objects",
                    rule.table, lines, declared.count
                ));
            }
        }
    }
    errors
}

/// Checks that every record in a table file has exactly `width` fields.
///
/// Returns a message for the first offending record, or for a file that
/// cannot be opened or parsed.
pub fn check_column_width(path: &Path, width: usize) -> Option<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => return Some(format!("error opening file {}: {}", path.display(), e)),
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut record = csv::ByteRecord::new();
    loop {
        match reader.read_byte_record(&mut record) {
            Ok(false) => return None,
            Ok(true) if record.len() == width => {}
            Ok(true) => {
                let line = record.position().map_or(0, |p| p.line());
                return Some(format!(
                    "CSV column count mismatch in file {}: record on line {}: wrong number of fields, expected {} got {}",
                    path.display(),
                    line,
                    width,
                    record.len()
                ));
            }
            Err(e) => {
                return Some(format!(
                    "CSV column count mismatch in file {}: {}",
                    path.display(),
                    e
                ))
            }
        }
    }
}
