//! All spellings seen for one canonical address

use super::variant::{self, Direction, Sighting, Variant};
use crate::error::{MailbookError, Result};
use std::collections::HashMap;

/// Every name/case variant of one address, with dates and counts
#[derive(Debug, Clone)]
pub struct AddressHistory {
    canonical: String,
    variants: HashMap<String, Variant>,
}

impl AddressHistory {
    /// Start a history from its first observation.
    ///
    /// When that observation carries a usable name, a bare-address
    /// placeholder is stored alongside it so the plain address stays
    /// completable on its own.
    ///
    /// # Errors
    /// Propagates merge errors; none are expected on a fresh history.
    pub fn create(
        name: Option<&str>,
        address: &str,
        date: Option<&str>,
        direction: Direction,
    ) -> Result<Self> {
        let canonical = address.to_lowercase();
        let mut variants = HashMap::new();
        if variant::filter_name(name, address).is_some() {
            variants.insert(canonical.clone(), Variant::placeholder(&canonical));
        }

        let mut history = Self {
            canonical,
            variants,
        };
        history.update(name, address, date, direction)?;
        Ok(history)
    }

    /// Record another observation of this address.
    ///
    /// # Errors
    /// Returns `AddressMismatch` if `address` does not fold to this
    /// history's canonical address, and `DuplicateVariant` if the stored
    /// variants are already inconsistent.
    pub fn update(
        &mut self,
        name: Option<&str>,
        address: &str,
        date: Option<&str>,
        direction: Direction,
    ) -> Result<()> {
        if address.to_lowercase() != self.canonical {
            return Err(MailbookError::AddressMismatch {
                expected: self.canonical.clone(),
                found: address.to_string(),
            });
        }

        let sighting = Sighting {
            name: variant::filter_name(name, address),
            address,
            date,
            direction,
        };
        variant::merge(&self.canonical, &mut self.variants, sighting)
    }

    /// The lower-cased address this history is keyed by
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Display strings and their statistics, in no particular order
    pub fn variants(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.variants.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Variants that have been counted at least once, skipping the
    /// bare-address placeholder until something lands on it
    pub fn observed_variants(&self) -> impl Iterator<Item = (&str, &Variant)> {
        self.variants().filter(|(_, v)| v.is_observed())
    }

    /// Look up a variant by its exact display string
    #[must_use]
    pub fn variant(&self, display: &str) -> Option<&Variant> {
        self.variants.get(display)
    }

    /// Variants sorted by display string
    #[must_use]
    pub fn sorted_variants(&self) -> Vec<(&str, &Variant)> {
        let mut sorted: Vec<_> = self.variants().collect();
        sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));
        sorted
    }

    /// Number of stored variants, placeholder included
    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether nothing could be stored for this address
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Total (sent, seen) across all variants
    #[must_use]
    pub fn totals(&self) -> (u64, u64) {
        self.variants.values().fold((0, 0), |(sent, seen), v| {
            (sent + u64::from(v.sent_count), seen + u64::from(v.seen_count))
        })
    }
}
