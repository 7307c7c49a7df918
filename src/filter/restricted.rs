//! Allow-lists of display names for addresses that spammers like to borrow

use crate::error::{MailbookError, Result};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Map from lower-cased address to the lower-cased names allowed with it
#[derive(Debug, Clone, Default)]
pub struct RestrictedList {
    allowed: HashMap<String, HashSet<String>>,
}

/// Split `Name <addr>` into its parts
fn split_full_address(line: &str) -> Option<(&str, &str)> {
    let open = line.find('<')?;
    let close = line.rfind('>').filter(|&c| c > open)?;
    Some((line[..open].trim(), line[open + 1..close].trim()))
}

impl RestrictedList {
    /// Parse one `Name <addr>` entry per line; blank lines are ignored
    ///
    /// # Errors
    /// Returns a configuration error for a line that has no `<address>`.
    pub fn from_lines(text: &str) -> Result<Self> {
        let mut list = Self::default();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (name, address) = split_full_address(line).ok_or_else(|| {
                MailbookError::Config(format!(
                    "restricted entry {} is not of the form 'Name <address>': {line:?}",
                    lineno + 1
                ))
            })?;
            list.allow(name, address);
        }
        Ok(list)
    }

    /// Load entries from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or an entry is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let list = Self::from_lines(&std::fs::read_to_string(path)?)?;
        debug!(
            "Loaded restrictions for {} addresses from {}",
            list.allowed.len(),
            path.display()
        );
        Ok(list)
    }

    /// Permit `name` for `address`
    pub fn allow(&mut self, name: &str, address: &str) {
        self.allowed
            .entry(address.to_lowercase())
            .or_default()
            .insert(name.to_lowercase());
    }

    /// Whether this pairing may be recorded.
    ///
    /// Unrestricted addresses and nameless sightings always pass.
    #[must_use]
    pub fn permits(&self, name: Option<&str>, address: &str) -> bool {
        match (self.allowed.get(&address.to_lowercase()), name) {
            (Some(names), Some(name)) => names.contains(&name.to_lowercase()),
            _ => true,
        }
    }

    /// Number of restricted addresses
    #[must_use]
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Whether no address is restricted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
