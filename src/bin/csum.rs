//! CSum CLI Binary
//!
//! Command-line interface for listing and reconciling directory snapshots.

use anyhow::Context;
use clap::Parser;
use csum::logging::init_logging;
use csum::tooling::cli::{Cli, CliContext};
use std::process;

fn run(cli: &Cli) -> anyhow::Result<()> {
    let context =
        CliContext::new(cli.config.as_deref()).context("Failed to load configuration")?;

    let logging = cli.logging_config(&context.config().logging)?;
    init_logging(Some(&logging)).context("Failed to initialize logging")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    context.execute(&cli.command, &mut out)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
