//! Error types for mailbook

use thiserror::Error;

/// Main error type for mailbook operations
#[derive(Error, Debug)]
pub enum MailbookError {
    /// An address was routed to the history of a different canonical address
    #[error("address '{found}' does not belong to history '{expected}'")]
    AddressMismatch {
        /// Canonical address of the history that received the update
        expected: String,
        /// Address that was passed in
        found: String,
    },

    /// More than one stored variant case-insensitively matches a new spelling
    #[error("'{candidate}' matches more than one stored variant of '{address}'")]
    DuplicateVariant {
        /// Canonical address whose history is corrupt
        address: String,
        /// Display string that matched twice
        candidate: String,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid skip-list expression
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path-related error
    #[error("Path error: {0}")]
    Path(String),
}

/// Result type alias for mailbook operations
pub type Result<T> = std::result::Result<T, MailbookError>;
