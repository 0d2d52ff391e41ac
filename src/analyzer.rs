//! The analysis pipeline.
//!
//! An [`Analyzer`] is bound to one deposit file. [`Analyzer::run`] executes
//! every stage in order:
//!
//! 1. Read the deposit envelope (type, id, watermark).
//! 2. Stream the rest of the file, flattening objects into the tables.
//! 3. Write the unique contact ids, then flush and close every table.
//! 4. Reopen each table to record its size and line count.
//! 5. Reconcile line counts with the counters and the header.
//! 6. Check every table's column widths.
//! 7. Write the JSON report.
//!
//! Stages 5 and 6 only collect messages. Everything else fails fast.
//!
//! # Example
//!
//! ```rust,no_run
//! use ryde_rs::Analyzer;
//!
//! let mut analyzer = Analyzer::new("example_2019-10-17_full_S1_R0.xml")?;
//! let report = analyzer.run()?;
//! for message in &report.errors {
//!     println!("{}", message);
//! }
//! # Ok::<(), ryde_rs::Error>(())
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::counters::Counters;
use crate::error::{Error, Result};
use crate::flatten::Flattener;
use crate::objects::{Deposit, Header};
use crate::reader::DepositReader;
use crate::router::{self, DepositObject, Route};
use crate::tables::{Table, TableSink};
use crate::validation::{self, CsvFileInfo};

const XML_EXTENSION: &str = ".xml";
const REPORT_SUFFIX: &str = "-analysis.json";

/// Name and size of the analyzed deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlFileInfo {
    /// Path of the deposit as given
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
}

/// Everything known after an analysis; serialized as the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The deposit file
    pub xml_file: XmlFileInfo,
    /// Written tables, keyed by table name
    pub csv_files: BTreeMap<Table, CsvFileInfo>,
    /// Deposit envelope, once read
    pub deposit: Option<Deposit>,
    /// Deposit header, if the deposit has one
    pub header: Option<Header>,
    /// Rows counted per table during the main pass
    pub counters: Counters,
    /// Reconciliation discrepancies, in the order found
    pub errors: Vec<String>,
}

/// Analyzes one escrow deposit file.
pub struct Analyzer {
    config: AnalyzerConfig,
    xml_file: XmlFileInfo,
    base: PathBuf,
    deposit: Option<Deposit>,
    header: Option<Header>,
    counters: Counters,
    csv_files: BTreeMap<Table, CsvFileInfo>,
    errors: Vec<String>,
}

impl Analyzer {
    /// Creates an analyzer with the standard configuration.
    ///
    /// Fails with [`Error::InvalidFileName`] unless the path ends in `.xml`,
    /// and with an I/O error if the file cannot be stat'ed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, AnalyzerConfig::default())
    }

    /// Creates an analyzer with a custom configuration.
    pub fn with_config(path: impl AsRef<Path>, config: AnalyzerConfig) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.to_string_lossy().into_owned();
        let Some(base) = file_name.strip_suffix(XML_EXTENSION) else {
            return Err(Error::InvalidFileName(file_name));
        };
        if base.is_empty() || base.ends_with(std::path::MAIN_SEPARATOR) {
            return Err(Error::InvalidFileName(file_name));
        }
        let base = PathBuf::from(base);

        let file_size = fs::metadata(path)?.len();
        info!(
            file = %file_name,
            size_mb = %format!("{:.2}", file_size as f64 / (1024.0 * 1024.0)),
            "analyzing deposit"
        );

        Ok(Self {
            config,
            xml_file: XmlFileInfo {
                file_name,
                file_size,
            },
            base,
            deposit: None,
            header: None,
            counters: Counters::new(),
            csv_files: BTreeMap::new(),
            errors: Vec::new(),
        })
    }

    /// Path of the deposit file.
    pub fn xml_path(&self) -> &Path {
        Path::new(&self.xml_file.file_name)
    }

    /// The deposit path without its `.xml` extension; table files are named
    /// after it.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// Path of the JSON report.
    pub fn report_path(&self) -> PathBuf {
        let mut name = self.base.as_os_str().to_os_string();
        name.push(REPORT_SUFFIX);
        PathBuf::from(name)
    }

    /// Path of a table's CSV file.
    pub fn table_path(&self, table: Table) -> PathBuf {
        table.path_for(&self.base)
    }

    /// The deposit envelope, once read.
    pub fn deposit(&self) -> Option<&Deposit> {
        self.deposit.as_ref()
    }

    /// The deposit header, once seen.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Counters from the main pass.
    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Discrepancies recorded so far.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn open(&self) -> Result<DepositReader<BufReader<File>>> {
        let file = File::open(self.xml_path())?;
        Ok(DepositReader::from_reader(BufReader::new(file)))
    }

    /// Reads only the deposit envelope.
    ///
    /// Fails with [`Error::DepositNotFound`] if the file holds no
    /// `<rde:deposit>` element.
    pub fn analyze_deposit_tag(&mut self) -> Result<&Deposit> {
        let mut reader = self.open()?;
        let deposit = reader.read_deposit()?;
        info!(
            id = %deposit.id,
            deposit_type = %deposit.deposit_type,
            watermark = %deposit.watermark,
            "found deposit"
        );
        let deposit: &Deposit = self.deposit.insert(deposit);
        Ok(deposit)
    }

    /// Runs the main pass over the whole file, writing every table.
    pub fn analyze_tags(&mut self) -> Result<()> {
        let mut reader = self.open()?;
        self.process_tags(&mut reader)
    }

    fn process_tags<R: BufRead>(&mut self, reader: &mut DepositReader<R>) -> Result<()> {
        let sink = TableSink::create(&self.base)?;
        let mut flattener = Flattener::new(sink);

        while let Some(tag) = reader.next_start()? {
            let kind = match router::resolve(&tag) {
                Route::Ignore => continue,
                Route::Mismatch(kind) => {
                    debug!(
                        element = %tag.local_name,
                        namespace = tag.namespace.as_deref().unwrap_or_default(),
                        "skipping {} outside its namespace",
                        kind
                    );
                    reader.skip_element(&tag)?;
                    continue;
                }
                Route::Object(kind) => kind,
            };

            let element = reader.decode_element(&tag)?;
            match DepositObject::decode(kind, &element)? {
                DepositObject::Header(header) => self.header = Some(header),
                DepositObject::Registrar(registrar) => flattener.registrar(&registrar)?,
                DepositObject::Contact(contact) => flattener.contact(&contact)?,
                DepositObject::Domain(domain) => flattener.domain(&domain)?,
                DepositObject::Host(host) => flattener.host(&host)?,
                DepositObject::IdnTableRef(idn) => flattener.idn_table_ref(&idn)?,
                DepositObject::Nndn(nndn) => flattener.nndn(&nndn)?,
                DepositObject::EppParams(params) => flattener.epp_params(&params)?,
                DepositObject::Policy(policy) => flattener.policy(&policy)?,
            }
        }
        info!("reached end of input");

        flattener.finish()?;
        flattener.sink_mut().close()?;
        self.counters = *flattener.counters();
        Ok(())
    }

    /// Reopens every table to record its size and line count.
    pub fn count_lines_and_sizes(&mut self) -> Result<()> {
        for table in Table::ALL {
            let info = CsvFileInfo::read(&self.table_path(table))?;
            self.csv_files.insert(table, info);
        }
        Ok(())
    }

    fn record(&mut self, messages: Vec<String>) {
        for message in messages {
            warn!("{}", message);
            self.errors.push(message);
        }
    }

    /// Compares line counts with the counters and the header.
    pub fn check_validation_rules(&mut self) {
        let messages = validation::check_counts(
            &self.config,
            &self.csv_files,
            &self.counters,
            self.header.as_ref(),
        );
        self.record(messages);
    }

    /// Checks the column count of every record in every table.
    pub fn check_column_widths(&mut self) {
        let messages = Table::ALL
            .iter()
            .filter_map(|&table| {
                validation::check_column_width(&self.table_path(table), table.width())
            })
            .collect();
        self.record(messages);
    }

    /// Snapshot of the current state as a report.
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            xml_file: self.xml_file.clone(),
            csv_files: self.csv_files.clone(),
            deposit: self.deposit.clone(),
            header: self.header.clone(),
            counters: self.counters,
            errors: self.errors.clone(),
        }
    }

    /// Writes the report as pretty-printed JSON next to the deposit.
    pub fn write_report(&self) -> Result<PathBuf> {
        let path = self.report_path();
        let mut out = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut out, &self.report())?;
        out.flush()?;
        info!(file = %path.display(), "wrote analysis report");
        Ok(path)
    }

    /// Runs every stage and returns the report.
    ///
    /// The envelope and the body are read in one forward pass over the file.
    pub fn run(&mut self) -> Result<AnalysisReport> {
        let mut reader = self.open()?;
        let deposit = reader.read_deposit()?;
        info!(
            id = %deposit.id,
            deposit_type = %deposit.deposit_type,
            watermark = %deposit.watermark,
            "found deposit"
        );
        self.deposit = Some(deposit);
        self.process_tags(&mut reader)?;
        drop(reader);

        self.count_lines_and_sizes()?;
        self.check_validation_rules();
        self.check_column_widths();
        if self.config.write_report {
            self.write_report()?;
        }

        if self.errors.is_empty() {
            info!("analysis finished without discrepancies");
        } else {
            info!(count = self.errors.len(), "analysis finished with discrepancies");
        }
        Ok(self.report())
    }
}
