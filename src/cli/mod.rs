//! CLI argument parsing using clap

use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// mailbook - Build a deduplicated address book from mbox files
#[derive(Parser, Debug)]
#[command(name = "mailbook")]
#[command(version)]
#[command(about = "Build a deduplicated address book with name variants and sent/seen counts from mbox files")]
#[command(long_about = None)]
pub struct Args {
    /// Mbox files or directories of mbox files (reads stdin when omitted)
    pub inputs: Vec<PathBuf>,

    /// Output file, or - for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Output syntax
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Elisp)]
    pub format: OutputFormat,

    /// Text that marks a From header as your own (e.g. "jrandom@"); repeatable
    #[arg(long = "me", value_name = "PATTERN")]
    pub me: Vec<String>,

    /// File of "Name <address>" lines; restricted addresses only keep these names
    #[arg(long)]
    pub restricteds: Option<PathBuf>,

    /// File of regular expressions, one per line; matching names or addresses are skipped
    #[arg(long)]
    pub skip_regexps: Option<PathBuf>,

    /// RON file replacing the built-in spam and robot heuristics
    #[arg(long)]
    pub noise_config: Option<PathBuf>,

    /// Threads used for header parsing (0 = one per CPU)
    #[arg(short, long, default_value = "0")]
    pub workers: usize,

    /// Hide the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
