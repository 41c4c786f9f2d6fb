//! # qdesk
//!
//! Command-line host for the quotation pricing engine and document codec.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  qdesk totals  record.json [--json]      price and print               │
//! │  qdesk render  record.json [--out-dir]   price, fetch images, render,  │
//! │                                          embed, write quotation-*.pdf  │
//! │  qdesk import  file.pdf [--out] [--submit]                             │
//! │                                          extract template, optionally  │
//! │                                          POST it to the API            │
//! │  qdesk invoice record.json [--json]      invoice-level GST totals      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results go to stdout, logs and errors to stderr. Exit code is 1 on any
//! error.

mod api;
mod cli;
mod commands;
mod config;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::QdeskConfig;
use crate::error::CliResult;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = QdeskConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Totals(args) => commands::totals::run(&args),
        Command::Render(args) => commands::render::run(&args, &config).await,
        Command::Import(args) => commands::import::run(&args, &config).await,
        Command::Invoice(args) => commands::invoice::run(&args),
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=qdesk_doc=trace` - Trace one crate
/// - Default: WARN, raised by `-v` / `-vv`
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info,qdesk=debug",
        _ => "debug,qdesk=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
