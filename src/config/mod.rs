//! Configuration structures for mailbook

use crate::cli::Args;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the mailbook processor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Mbox files or directories; empty means stdin
    pub input_paths: Vec<PathBuf>,

    /// Output file, `-` for stdout
    pub output_path: PathBuf,

    /// Output syntax
    pub format: OutputFormat,

    /// Substrings of a From header that identify the operator
    pub operator_patterns: Vec<String>,

    /// Restricted allow-list file
    pub restricted_path: Option<PathBuf>,

    /// Skip-regex list file
    pub skip_regexps_path: Option<PathBuf>,

    /// RON noise heuristics file
    pub noise_config_path: Option<PathBuf>,

    /// Header-parsing threads (0 = auto)
    pub max_workers: usize,

    /// Show the progress spinner
    pub show_progress: bool,

    /// Enable debug logging
    pub debug_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_paths: Vec::new(),
            output_path: PathBuf::from("-"),
            format: OutputFormat::Elisp,
            operator_patterns: Vec::new(),
            restricted_path: None,
            skip_regexps_path: None,
            noise_config_path: None,
            max_workers: 0,
            show_progress: true,
            debug_mode: false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input_paths: args.inputs,
            output_path: args.output,
            format: args.format,
            operator_patterns: args.me,
            restricted_path: args.restricteds,
            skip_regexps_path: args.skip_regexps,
            noise_config_path: args.noise_config,
            max_workers: args.workers,
            show_progress: !args.no_progress,
            debug_mode: args.debug,
        }
    }
}

impl Config {
    /// Whether input comes from stdin
    #[must_use]
    pub fn reads_stdin(&self) -> bool {
        self.input_paths.is_empty()
    }
}
