//! The identity-merge engine: a deduplicated address book keyed by
//! lower-cased address
//!
//! Observations must be ingested one at a time, in input order. Each
//! [`AddressHistory`] keeps at most one variant per case-folded display
//! string, and that only holds if updates to it are sequential.

pub mod case;
pub mod date;
mod history;
mod variant;

pub use date::DateCode;
pub use history::AddressHistory;
pub use variant::{filter_name, Direction, Variant};

use crate::error::Result;
use log::trace;
use serde::Serialize;
use std::collections::HashMap;

/// One (name, address, date, direction) sighting from a message header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Display name, if the header had one
    pub name: Option<String>,
    /// Address as spelled in the header
    pub address: String,
    /// Date of the message, canonical `YYYY Mon DD` when it could be derived
    pub date: Option<String>,
    /// Whether the operator sent the message
    pub direction: Direction,
}

/// Map from canonical (lower-cased) address to its history
#[derive(Debug, Default, Clone)]
pub struct AddressBook {
    histories: HashMap<String, AddressHistory>,
}

impl AddressBook {
    /// An empty book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one sighting of `address`.
    ///
    /// # Errors
    /// Fails only when an existing history is internally inconsistent
    /// (`DuplicateVariant`); the caller should treat that as fatal.
    pub fn ingest(
        &mut self,
        address: &str,
        name: Option<&str>,
        date: Option<&str>,
        direction: Direction,
    ) -> Result<()> {
        let key = address.to_lowercase();
        if let Some(history) = self.histories.get_mut(&key) {
            history.update(name, address, date, direction)
        } else {
            trace!("First sighting of {key}");
            let history = AddressHistory::create(name, address, date, direction)?;
            self.histories.insert(key, history);
            Ok(())
        }
    }

    /// Absorb an [`Observation`]
    ///
    /// # Errors
    /// See [`AddressBook::ingest`].
    pub fn ingest_observation(&mut self, observation: &Observation) -> Result<()> {
        self.ingest(
            &observation.address,
            observation.name.as_deref(),
            observation.date.as_deref(),
            observation.direction,
        )
    }

    /// History for an address, in any capitalization
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&AddressHistory> {
        self.histories.get(&address.to_lowercase())
    }

    /// Number of distinct canonical addresses
    #[must_use]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Whether nothing has been ingested
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// All histories, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AddressHistory)> {
        self.histories.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All histories sorted by canonical address
    #[must_use]
    pub fn sorted(&self) -> Vec<&AddressHistory> {
        let mut sorted: Vec<&AddressHistory> = self.histories.values().collect();
        sorted.sort_unstable_by(|a, b| a.canonical().cmp(b.canonical()));
        sorted
    }

    /// Total number of stored variants across every address
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.histories.values().map(AddressHistory::len).sum()
    }
}
