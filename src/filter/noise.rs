//! Heuristics for spam and robot addresses that are never worth completing

use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Noise heuristics, loadable from a RON file.
///
/// All matching is case-sensitive substring search on the raw header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Rejected when found in either the name or the address
    pub anywhere_terms: Vec<String>,
    /// Rejected when found in the name
    pub name_terms: Vec<String>,
    /// Rejected when found in the address
    pub address_terms: Vec<String>,
    /// Rejected when the first term is in the name and the second in the address
    #[serde(default)]
    pub paired_terms: Vec<(String, String)>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            anywhere_terms: vec!["via StreetEasy".into()],
            name_terms: vec![" Viagra".into(), " Cialis".into()],
            address_terms: vec![
                "Viagra ".into(),
                "Cialis ".into(),
                "donotreply".into(),
                "-allow-".into(),
                "-reject-".into(),
                "-discuss-owner".into(),
                "unknown.person".into(),
                "@unknown.email".into(),
                "notify@twitter.com".into(),
                "@postmaster.twitter.com".into(),
            ],
            // Unlike "Google Drive" mail, these never carry a usable address
            paired_terms: vec![("Google Docs".into(), "@docs.google.com".into())],
        }
    }
}

impl NoiseConfig {
    /// Load heuristics from a RON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, NoiseLoadError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = ron::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if given, falling back to the built-in heuristics
    /// when the file is missing or broken
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.exists() => Self::load_from_file(path).unwrap_or_else(|e| {
                warn!(
                    "Failed to load noise config from {}: {e}. Using defaults.",
                    path.display()
                );
                Self::default()
            }),
            Some(path) => {
                warn!("Noise config {} not found. Using defaults.", path.display());
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Whether this raw (name, address) pair should be thrown away
    #[must_use]
    pub fn is_noise(&self, name: &str, address: &str) -> bool {
        self.anywhere_terms
            .iter()
            .any(|t| name.contains(t.as_str()) || address.contains(t.as_str()))
            || self.name_terms.iter().any(|t| name.contains(t.as_str()))
            || self.address_terms.iter().any(|t| address.contains(t.as_str()))
            || self
                .paired_terms
                .iter()
                .any(|(n, a)| name.contains(n.as_str()) && address.contains(a.as_str()))
    }
}

/// Error type for noise config loading
#[derive(Debug, thiserror::Error)]
pub enum NoiseLoadError {
    /// IO error reading file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// RON parse error
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
