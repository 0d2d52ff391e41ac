//! rde-envelope - Print the `<rde:deposit>` envelope for a new deposit.
//!
//! # Usage
//!
//! ```bash
//! rde-envelope --type FULL --id 20191017001
//! rde-envelope --type diff --id 20191018001 --prev-id 20191017001 --resend 1
//! ```
//!
//! The watermark is the current UTC time.

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ryde_rs::objects::Deposit;
use ryde_rs::writer::{EnvelopeWriter, WriterConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the envelope of a new RDE escrow deposit.
#[derive(Parser, Debug)]
#[command(name = "rde-envelope")]
#[command(version = VERSION)]
#[command(about = "Print the envelope of a new RDE escrow deposit")]
struct Args {
    /// Deposit type, FULL or DIFF
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    deposit_type: String,

    /// Deposit id
    #[arg(long)]
    id: String,

    /// Id of the previous deposit
    #[arg(long, default_value = "")]
    prev_id: String,

    /// Resend counter
    #[arg(long, default_value_t = 0)]
    resend: i64,

    /// Output compact XML (no indentation, no declaration)
    #[arg(long)]
    compact: bool,
}

fn run(args: &Args) -> ryde_rs::Result<()> {
    let deposit = Deposit::new(
        &args.deposit_type,
        args.id.as_str(),
        args.prev_id.as_str(),
        args.resend,
        Utc::now(),
    )?;
    tracing::debug!(id = %deposit.id, deposit_type = %deposit.deposit_type, "writing envelope");

    let config = if args.compact {
        WriterConfig::compact()
    } else {
        WriterConfig::default()
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    EnvelopeWriter::with_config(config).write(&deposit, None, &mut out)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
