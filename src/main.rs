//! mailbook - Build an email address database from mbox files
//!
//! Reads one or more mbox files (or stdin), records every name/address
//! spelling seen with its latest date and sent/seen counts, and writes the
//! deduplicated result as elisp, CSV or JSON.

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use std::time::Instant;

use mailbook::cli::Args;
use mailbook::{Config, Processor};

fn main() -> Result<()> {
    let config: Config = Args::parse().into();

    // Initialize logging
    let log_level = if config.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_timestamp_millis()
        .init();

    info!("mailbook {}", env!("CARGO_PKG_VERSION"));

    if let Some(missing) = config.input_paths.iter().find(|p| !p.exists()) {
        error!("Input path does not exist: {}", missing.display());
        std::process::exit(1);
    }

    let start = Instant::now();

    let mut processor = Processor::new(config)?;
    if let Err(e) = processor.process() {
        error!("{e}");
        return Err(e.into());
    }

    info!("Processing completed in {:?}", start.elapsed());

    Ok(())
}
