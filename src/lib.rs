//! Registry data escrow (RDE) deposit analysis for Rust.
//!
//! This crate reads RFC 9022 style escrow deposits, flattens every object
//! into a fixed set of CSV tables and reconciles what it wrote against the
//! counts the deposit declares about itself.
//!
//! # Features
//!
//! - **Streaming Reader**: Deposits of any size are read forward once; only
//!   the object currently being flattened is held in memory.
//! - **Flattening**: Domains, hosts, contacts, registrars, IDN tables, NNDNs,
//!   EPP parameters and policies become rows in 18 CSV tables.
//! - **Reconciliation**: Row counts are checked against the in-memory
//!   counters, the deposit header and the column layout of each table.
//! - **Envelope Writer**: Generate the `<rde:deposit>` envelope of a new
//!   deposit.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ryde_rs::Analyzer;
//!
//! let mut analyzer = Analyzer::new("example_2019-10-17_full_S1_R0.xml")?;
//! let report = analyzer.run()?;
//!
//! println!("domains: {}", report.counters.get(ryde_rs::Table::Domain));
//! for message in &report.errors {
//!     eprintln!("{}", message);
//! }
//! # Ok::<(), ryde_rs::Error>(())
//! ```
//!
//! # Module Structure
//!
//! - [`analyzer`] - The end-to-end pipeline and report
//! - [`reader`] - Streaming deposit reader
//! - [`router`] - Start tag routing and typed object decoding
//! - [`flatten`] - Object to row flattening
//! - [`tables`] - Table registry and CSV output
//! - [`validation`] - Line counting and reconciliation
//! - [`objects`] - Escrow object types
//! - [`writer`] - Deposit envelope writer
//! - [`error`] - Error types
//!
//! # Optional Features
//!
//! - `cli` - Build the `rde-analyze` and `rde-envelope` binaries

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod analyzer;
pub mod config;
pub mod counters;
pub mod element;
pub mod error;
pub mod flatten;
pub mod normalize;
pub mod objects;
pub mod reader;
pub mod router;
pub mod tables;
pub mod validation;
pub mod writer;

// Re-export commonly used types at the crate root
pub use analyzer::{AnalysisReport, Analyzer};
pub use config::AnalyzerConfig;
pub use counters::Counters;
pub use error::{Error, Result};
pub use objects::{Deposit, DepositType, Header};
pub use reader::DepositReader;
pub use tables::Table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
