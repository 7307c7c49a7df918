//! Address book export

mod csv;
pub mod elisp;
pub mod json;

pub use self::csv::CsvWriter;

use crate::book::AddressBook;
use crate::error::Result;
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Marker written for a variant whose date is unknown
pub const UNKNOWN_DATE: &str = "N/A";

/// Output syntax for the finished book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One Lisp form per address
    #[default]
    Elisp,
    /// One row per variant
    Csv,
    /// Array of address records
    Json,
}

/// Open `path` for writing, or stdout when the path is `-`
///
/// # Errors
/// Returns an error if the file or its parent directory cannot be created.
pub fn open_sink(path: &Path) -> Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    debug!("Writing output to {}", path.display());
    Ok(Box::new(BufWriter::with_capacity(64 * 1024, file)))
}

/// Write the whole book in `format`, addresses sorted
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_book<W: Write>(book: &AddressBook, format: OutputFormat, sink: &mut W) -> Result<()> {
    let histories = book.sorted();
    match format {
        OutputFormat::Elisp => elisp::write_histories(sink, histories)?,
        OutputFormat::Json => json::write_histories(sink, histories)?,
        OutputFormat::Csv => {
            let mut writer = CsvWriter::new(&mut *sink)?;
            for history in histories {
                writer.write_history(history)?;
            }
            writer.flush()?;
            debug!("Wrote {} CSV rows", writer.record_count());
        }
    }
    sink.flush()?;
    Ok(())
}
