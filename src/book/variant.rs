//! Spelling variants of one address and the rules for folding a new
//! observation into them

use super::case::{prefer_address, prefer_name};
use super::date::{self, DateCode};
use crate::error::{MailbookError, Result};
use log::trace;
use serde::Serialize;
use std::collections::HashMap;

/// Whether the operator sent to an address or merely saw it go by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The address was on a message the operator sent
    Sent,
    /// The address was on someone else's message
    Seen,
}

impl Direction {
    /// Pick the direction from a "did I send this" flag
    #[must_use]
    pub const fn from_sent(sent: bool) -> Self {
        if sent {
            Self::Sent
        } else {
            Self::Seen
        }
    }

    /// (sent, seen) increments for one observation
    const fn increments(self) -> (u32, u32) {
        match self {
            Self::Sent => (1, 0),
            Self::Seen => (0, 1),
        }
    }
}

/// One display spelling of an address together with its usage statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Display name, if this spelling has one
    pub name: Option<String>,
    /// Address exactly as spelled in this variant
    pub address: String,
    /// Most recent date this spelling was seen (`None` when unknown)
    pub last_seen: Option<String>,
    /// Times the operator sent to this spelling
    pub sent_count: u32,
    /// Times this spelling was seen on other mail
    pub seen_count: u32,
}

impl Variant {
    /// A bare-address entry with no history yet
    #[must_use]
    pub fn placeholder(address: &str) -> Self {
        Self {
            name: None,
            address: address.to_string(),
            last_seen: None,
            sent_count: 0,
            seen_count: 0,
        }
    }

    /// `Name <address>`, or just `address` when there is no name
    #[must_use]
    pub fn display(&self) -> String {
        render(self.name.as_deref(), &self.address)
    }

    /// Encoded form of `last_seen`
    #[must_use]
    pub fn date_code(&self) -> DateCode {
        DateCode::from(self.last_seen.as_deref())
    }

    /// Whether any observation has been counted against this spelling
    #[must_use]
    pub const fn is_observed(&self) -> bool {
        self.sent_count > 0 || self.seen_count > 0
    }
}

/// Render a display string from its parts
#[must_use]
pub fn render(name: Option<&str>, address: &str) -> String {
    match name {
        Some(name) => format!("{name} <{address}>"),
        None => address.to_string(),
    }
}

/// Drop names that carry no information beyond the address itself.
///
/// A name equal to the address, containing `@`, consisting of a lone
/// backslash, or still in raw MIME encoded-word form (`=?...`) would
/// otherwise shadow a real name seen later.
#[must_use]
pub fn filter_name<'a>(name: Option<&'a str>, address: &str) -> Option<&'a str> {
    name.filter(|n| {
        !(n.to_lowercase() == address.to_lowercase()
            || n.contains('@')
            || *n == "\\"
            || n.starts_with("=?"))
    })
}

/// Display strings that are never stored.
///
/// Both come from specific malformed historical messages.
fn is_poisoned(display: &str) -> bool {
    display == "\\" || display.contains('#')
}

/// A single incoming observation, already reduced to plain strings
#[derive(Debug, Clone, Copy)]
pub struct Sighting<'a> {
    /// Filtered display name
    pub name: Option<&'a str>,
    /// Address as spelled in the message
    pub address: &'a str,
    /// Date text, canonical or not
    pub date: Option<&'a str>,
    /// Sent or seen
    pub direction: Direction,
}

/// Fold `sighting` into `variants`, the spellings stored for `canonical`.
///
/// At most one stored display string may equal the new one under case
/// folding; finding two is reported as [`MailbookError::DuplicateVariant`].
///
/// # Errors
/// Returns `DuplicateVariant` when the variant set already violates the
/// one-variant-per-case-class invariant.
pub fn merge(
    canonical: &str,
    variants: &mut HashMap<String, Variant>,
    sighting: Sighting<'_>,
) -> Result<()> {
    let candidate = render(sighting.name, sighting.address);
    if is_poisoned(&candidate) {
        trace!("Ignoring unstorable spelling {candidate:?} for {canonical}");
        return Ok(());
    }

    let folded = candidate.to_lowercase();
    let mut matches = variants.keys().filter(|key| key.to_lowercase() == folded);
    let existing = matches.next().cloned();
    if matches.next().is_some() {
        return Err(MailbookError::DuplicateVariant {
            address: canonical.to_string(),
            candidate,
        });
    }

    let (sent, seen) = sighting.direction.increments();

    let Some(existing_key) = existing else {
        trace!("New spelling {candidate:?} for {canonical}");
        variants.insert(
            candidate,
            Variant {
                name: sighting.name.map(str::to_string),
                address: sighting.address.to_string(),
                last_seen: sighting.date.map(str::to_string),
                sent_count: sent,
                seen_count: seen,
            },
        );
        return Ok(());
    };

    let Some(old) = variants.remove(&existing_key) else {
        return Ok(());
    };
    variants.remove(&candidate);

    let merged = Variant {
        name: prefer_name(sighting.name, old.name.as_deref()).map(str::to_string),
        address: prefer_address(sighting.address, &old.address).to_string(),
        last_seen: date::later(sighting.date, old.last_seen.as_deref()).map(str::to_string),
        sent_count: old.sent_count + sent,
        seen_count: old.seen_count + seen,
    };
    let key = merged.display();
    if key != existing_key {
        trace!("Respelled {existing_key:?} as {key:?}");
    }
    variants.insert(key, merged);

    Ok(())
}
