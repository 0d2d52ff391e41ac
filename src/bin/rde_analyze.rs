//! rde-analyze - Flatten an escrow deposit into CSV tables and reconcile it.
//!
//! Reads an RDE deposit, writes one CSV file per object table next to it,
//! then checks the written row counts against the deposit's own header and
//! records the outcome in a JSON report.
//!
//! # Usage
//!
//! ```bash
//! rde-analyze --file <DEPOSIT.xml>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Analyze a full deposit
//! rde-analyze --file example_2019-10-17_full_S1_R0.xml
//!
//! # Show namespace skips and other debug events
//! RUST_LOG=debug rde-analyze --file example_2019-10-17_full_S1_R0.xml
//! ```
//!
//! # Output
//!
//! For `<base>.xml` the tool writes `<base>-domains.csv`, `<base>-hosts.csv`
//! and the other tables, plus `<base>-analysis.json`. Discrepancies are
//! logged as warnings and listed in the report; they do not change the exit
//! status.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ryde_rs::Analyzer;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flatten an RDE escrow deposit into CSV tables and reconcile the counts.
#[derive(Parser, Debug)]
#[command(name = "rde-analyze")]
#[command(version = VERSION)]
#[command(about = "Flatten an RDE escrow deposit into CSV tables and reconcile the counts")]
struct Args {
    /// Deposit file to analyze; must end in .xml
    #[arg(short, long, value_name = "DEPOSIT.xml")]
    file: PathBuf,
}

fn run(args: &Args) -> ryde_rs::Result<usize> {
    let mut analyzer = Analyzer::new(&args.file)?;
    let report = analyzer.run()?;
    Ok(report.errors.len())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(discrepancies) => {
            eprintln!(
                "{} discrepancies found, see the analysis report",
                discrepancies
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
