//! Operator-supplied regular expressions for addresses to leave out

use crate::error::Result;
use log::debug;
use regex::RegexSet;
use std::path::Path;

/// A set of expressions tested separately against names and addresses
#[derive(Debug, Clone)]
pub struct SkipList {
    patterns: RegexSet,
}

impl Default for SkipList {
    fn default() -> Self {
        Self {
            patterns: RegexSet::empty(),
        }
    }
}

impl SkipList {
    /// Compile one expression per line; blank lines are ignored
    ///
    /// # Errors
    /// Returns an error if any line is not a valid regular expression.
    pub fn from_lines(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let patterns = RegexSet::new(lines)?;
        Ok(Self { patterns })
    }

    /// Load expressions from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or a line does not compile.
    pub fn load(path: &Path) -> Result<Self> {
        let list = Self::from_lines(&std::fs::read_to_string(path)?)?;
        debug!("Loaded {} skip expressions from {}", list.len(), path.display());
        Ok(list)
    }

    /// Whether the name (if any) or the address matches any expression
    #[must_use]
    pub fn matches(&self, name: Option<&str>, address: &str) -> bool {
        name.is_some_and(|n| self.patterns.is_match(n)) || self.patterns.is_match(address)
    }

    /// Number of expressions
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether there are no expressions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
