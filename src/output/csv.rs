//! CSV output writing

use crate::book::AddressHistory;
use crate::error::Result;
use csv::Writer;
use std::io::Write;

/// Column names, one row per variant
const HEADER: [&str; 5] = ["Address", "Variant", "LastSeen", "SentCount", "SeenCount"];

/// CSV writer emitting one row per stored variant
pub struct CsvWriter<W: Write> {
    writer: Writer<W>,
    record_count: u64,
}

impl<W: Write> CsvWriter<W> {
    /// Wrap `sink` and write the header row
    ///
    /// # Errors
    /// Returns an error if the header cannot be written.
    pub fn new(sink: W) -> Result<Self> {
        let mut writer = Writer::from_writer(sink);
        writer.write_record(HEADER)?;
        Ok(Self {
            writer,
            record_count: 0,
        })
    }

    /// Write every variant of one address
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_history(&mut self, history: &AddressHistory) -> Result<()> {
        for (display, variant) in history.sorted_variants() {
            let sent = variant.sent_count.to_string();
            let seen = variant.seen_count.to_string();
            self.writer.write_record([
                history.canonical(),
                display,
                variant.last_seen.as_deref().unwrap_or(super::UNKNOWN_DATE),
                sent.as_str(),
                seen.as_str(),
            ])?;
            self.record_count += 1;
        }
        Ok(())
    }

    /// Flush the writer to ensure all data is written
    ///
    /// # Errors
    /// Returns an error if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Get the number of variant rows written
    #[must_use]
    pub const fn record_count(&self) -> u64 {
        self.record_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{AddressBook, Direction};

    #[test]
    fn test_csv_header_only() {
        let mut out = Vec::new();
        let mut writer = CsvWriter::new(&mut out).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.record_count(), 0);
        drop(writer);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Address,Variant,LastSeen,SentCount,SeenCount\n"
        );
    }

    #[test]
    fn test_csv_write_history() {
        let mut book = AddressBook::new();
        book.ingest("jim@x.com", Some("Smith, Jim"), Some("2011 Nov 07"), Direction::Sent)
            .unwrap();

        let mut out = Vec::new();
        let mut writer = CsvWriter::new(&mut out).unwrap();
        writer.write_history(book.get("jim@x.com").unwrap()).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.record_count(), 2);
        drop(writer);

        let content = String::from_utf8(out).unwrap();
        assert!(content.contains("jim@x.com,\"Smith, Jim <jim@x.com>\",2011 Nov 07,1,0"));
        assert!(content.contains("jim@x.com,jim@x.com,N/A,0,0"));
    }
}
