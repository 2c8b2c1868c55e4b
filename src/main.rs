//! archgate - Layered-architecture gate CLI
//!
//! Exits non-zero when the monorepo has violations at or above the
//! `--fail-on` severity, so it can block merges in CI.

mod cli;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<ExitCode> {
    // Parse CLI args first so --log-level can seed the filter
    let cli = cli::Cli::parse();

    // Initialize logging (stderr; stdout carries the report)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
