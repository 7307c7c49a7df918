//! JSON output

use crate::book::AddressHistory;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One variant as written to JSON
#[derive(Debug, Serialize)]
pub struct VariantRecord<'a> {
    /// `Name <address>` or the bare address
    pub display: &'a str,
    /// Display name, absent for the bare-address variant
    pub name: Option<&'a str>,
    /// Address spelling of this variant
    pub address: &'a str,
    /// Latest date seen, if any
    pub last_seen: Option<&'a str>,
    /// Messages from the operator that carried this variant
    pub sent_count: u32,
    /// Other messages that carried this variant
    pub seen_count: u32,
}

/// One canonical address and all its variants
#[derive(Debug, Serialize)]
pub struct AddressRecord<'a> {
    /// Canonical (lower-cased) address
    pub address: &'a str,
    /// Variants ordered by display string
    pub variants: Vec<VariantRecord<'a>>,
}

impl<'a> From<&'a AddressHistory> for AddressRecord<'a> {
    fn from(history: &'a AddressHistory) -> Self {
        Self {
            address: history.canonical(),
            variants: history
                .sorted_variants()
                .into_iter()
                .map(|(display, v)| VariantRecord {
                    display,
                    name: v.name.as_deref(),
                    address: &v.address,
                    last_seen: v.last_seen.as_deref(),
                    sent_count: v.sent_count,
                    seen_count: v.seen_count,
                })
                .collect(),
        }
    }
}

/// Write all histories as a pretty-printed JSON array
///
/// # Errors
/// Returns an error if serialization or writing fails.
pub fn write_histories<'a, W: Write>(
    sink: &mut W,
    histories: impl IntoIterator<Item = &'a AddressHistory>,
) -> Result<()> {
    let records: Vec<AddressRecord<'a>> = histories.into_iter().map(AddressRecord::from).collect();
    serde_json::to_writer_pretty(&mut *sink, &records)?;
    writeln!(sink)?;
    Ok(())
}
