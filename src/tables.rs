//! Tabular output: the fixed table registry and the CSV sink.
//!
//! Every run writes the same 18 tables next to the deposit, named
//! `<base><suffix>`. The sink owns one open file and CSV writer per table,
//! held in an array indexed by [`Table`], and releases them all on
//! [`TableSink::close`] (or on drop, when a pass aborts).

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// One of the fixed output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Table {
    /// One row per domain
    Domain,
    /// One row per domain status
    DomainStatus,
    /// One row per nameserver host of a domain
    DomainNameservers,
    /// One row per DS record
    DomainDnssec,
    /// One row per domain with a transfer state
    DomainTransfers,
    /// One row per host
    Host,
    /// One row per host address
    HostAddress,
    /// One row per host status
    HostStatus,
    /// One row per contact
    Contact,
    /// One row per contact status
    ContactStatus,
    /// One row per contact postal info
    ContactPostalInfo,
    /// One row per registrar
    Registrar,
    /// One row per registrar postal info
    RegistrarPostalInfo,
    /// One row per IDN table reference
    IdnLanguage,
    /// One row per NNDN
    Nndn,
    /// One row per distinct contact id referenced by domains
    #[serde(rename = "uniqueContactID")]
    UniqueContactId,
    /// One row per EPP parameters object
    EppParams,
    /// One row per policy
    Policy,
}

impl Table {
    /// Number of tables.
    pub const COUNT: usize = 18;

    /// All tables in registry order.
    pub const ALL: [Table; Table::COUNT] = [
        Table::Domain,
        Table::DomainStatus,
        Table::DomainNameservers,
        Table::DomainDnssec,
        Table::DomainTransfers,
        Table::Host,
        Table::HostAddress,
        Table::HostStatus,
        Table::Contact,
        Table::ContactStatus,
        Table::ContactPostalInfo,
        Table::Registrar,
        Table::RegistrarPostalInfo,
        Table::IdnLanguage,
        Table::Nndn,
        Table::UniqueContactId,
        Table::EppParams,
        Table::Policy,
    ];

    /// Position of this table in [`Table::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Logical category name, as used in the report and discrepancy messages.
    pub fn name(self) -> &'static str {
        match self {
            Table::Domain => "domain",
            Table::DomainStatus => "domainStatus",
            Table::DomainNameservers => "domainNameservers",
            Table::DomainDnssec => "domainDnssec",
            Table::DomainTransfers => "domainTransfers",
            Table::Host => "host",
            Table::HostAddress => "hostAddress",
            Table::HostStatus => "hostStatus",
            Table::Contact => "contact",
            Table::ContactStatus => "contactStatus",
            Table::ContactPostalInfo => "contactPostalInfo",
            Table::Registrar => "registrar",
            Table::RegistrarPostalInfo => "registrarPostalInfo",
            Table::IdnLanguage => "idnLanguage",
            Table::Nndn => "nndn",
            Table::UniqueContactId => "uniqueContactID",
            Table::EppParams => "eppParams",
            Table::Policy => "policy",
        }
    }

    /// File name suffix appended to the deposit's base name.
    pub fn suffix(self) -> &'static str {
        match self {
            Table::Domain => "-domains.csv",
            Table::DomainStatus => "-domainStatuses.csv",
            Table::DomainNameservers => "-domainNameservers.csv",
            Table::DomainDnssec => "-domainDnssec.csv",
            Table::DomainTransfers => "-domainTransfers.csv",
            Table::Host => "-hosts.csv",
            Table::HostAddress => "-hostAddresses.csv",
            Table::HostStatus => "-hostStatuses.csv",
            Table::Contact => "-contacts.csv",
            Table::ContactStatus => "-contactStatuses.csv",
            Table::ContactPostalInfo => "-contactPostalInfo.csv",
            Table::Registrar => "-registrars.csv",
            Table::RegistrarPostalInfo => "-registrarPostalInfo.csv",
            Table::IdnLanguage => "-idnLanguage.csv",
            Table::Nndn => "-nndns.csv",
            Table::UniqueContactId => "-uniqueContactIDs.csv",
            Table::EppParams => "-eppParams.csv",
            Table::Policy => "-policies.csv",
        }
    }

    /// Column names in output order. The files carry no header row; the
    /// width is what the column check enforces.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Domain => &[
                "Name",
                "RoID",
                "Uname",
                "IdnTableId",
                "OriginalName",
                "Registrant",
                "ClID",
                "CrRr",
                "CrDate",
                "ExDate",
                "UpRr",
                "UpDate",
            ],
            Table::DomainStatus => &["Name", "Status"],
            Table::DomainNameservers => &["Name", "HostObjID"],
            Table::DomainDnssec => &["Name", "KeyTag", "Algorithm", "DigestType", "Digest"],
            Table::DomainTransfers => &[
                "Name", "TrStatus", "ReID", "ReDate", "AcID", "AcDate", "ExDate",
            ],
            Table::Host => &["Name", "RoID", "ClID", "CrRr", "CrDate", "UpRr", "UpDate"],
            Table::HostAddress => &["Name", "Version", "Address"],
            Table::HostStatus => &["Name", "Status"],
            Table::Contact => &[
                "ID", "RoID", "Voice", "Fax", "Email", "ClID", "CrRr", "CrDate", "UpRr", "UpDate",
            ],
            Table::ContactStatus => &["ID", "Status"],
            Table::ContactPostalInfo => &[
                "ID", "Type", "Name", "Org", "Street1", "Street2", "Street3", "City", "SP", "PC",
                "CC",
            ],
            Table::Registrar => &[
                "ID", "Name", "GurID", "status", "WhoisURL", "URL", "CrDate", "UpDate", "Voice",
                "Fax", "email",
            ],
            Table::RegistrarPostalInfo => &[
                "ID",
                "Type",
                "Street1",
                "Street2",
                "Street3",
                "City",
                "StateProvince",
                "PostalCode",
                "CountryCode",
            ],
            Table::IdnLanguage => &["ID", "URL", "URLPolicy"],
            Table::Nndn => &[
                "AName",
                "UName",
                "IDNTableID",
                "OriginalName",
                "NameState",
                "CrDate",
            ],
            Table::UniqueContactId => &["ID"],
            Table::EppParams => &["Version", "Lang", "Value"],
            Table::Policy => &["Scope", "Element"],
        }
    }

    /// Expected number of fields per row.
    pub fn width(self) -> usize {
        self.columns().len()
    }

    /// Output path for a deposit base path (the deposit path minus `.xml`).
    pub fn path_for(self, base: &Path) -> PathBuf {
        let mut name = base.as_os_str().to_os_string();
        name.push(self.suffix());
        PathBuf::from(name)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destination for flattened rows.
pub trait RowSink {
    /// Writes one row to a table.
    fn write_row(&mut self, table: Table, row: &[String]) -> Result<()>;
}

/// In-memory sink, collecting rows in write order.
impl RowSink for Vec<(Table, Vec<String>)> {
    fn write_row(&mut self, table: Table, row: &[String]) -> Result<()> {
        self.push((table, row.to_vec()));
        Ok(())
    }
}

/// Writes rows to the per-table CSV files.
///
/// Handles are acquired together in [`TableSink::create`] and released
/// together: all writers are flushed first, then all files are closed.
pub struct TableSink {
    writers: Vec<Option<csv::Writer<File>>>,
}

impl TableSink {
    /// Creates (truncating) every table file for the given base path.
    pub fn create(base: &Path) -> Result<Self> {
        let mut writers = Vec::with_capacity(Table::COUNT);
        for table in Table::ALL {
            let file = File::create(table.path_for(base))?;
            let writer = csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(file);
            writers.push(Some(writer));
        }
        Ok(Self { writers })
    }

    /// Flushes every writer, then closes every file.
    pub fn close(&mut self) -> Result<()> {
        for writer in self.writers.iter_mut().flatten() {
            writer.flush()?;
        }
        for slot in self.writers.iter_mut() {
            if let Some(writer) = slot.take() {
                let file = writer.into_inner().map_err(|e| e.into_error())?;
                drop(file);
            }
        }
        Ok(())
    }
}

impl RowSink for TableSink {
    /// Writing after [`TableSink::close`] fails with an I/O error.
    fn write_row(&mut self, table: Table, row: &[String]) -> Result<()> {
        match self.writers[table.index()].as_mut() {
            Some(writer) => {
                writer.write_record(row)?;
                Ok(())
            }
            None => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                format!("table {} is already closed", table),
            )
            .into()),
        }
    }
}
