//! Turning one raw message into address book observations

use super::{canonical_date, clean_address, clean_name, is_from_operator};
use crate::book::{Direction, Observation};
use crate::filter::{NoiseConfig, RestrictedList, SkipList};
use crate::mbox::MessageHeaders;
use log::trace;

/// What came out of one message
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageOutcome {
    /// Observations to ingest, in header order
    pub observations: Vec<Observation>,
    /// Addresses dropped by one of the filters, plus address headers that
    /// could not be parsed
    pub skipped: usize,
    /// Whether the header block could not be parsed
    pub unparsable: bool,
}

/// Filters and operator identity applied to every message
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    noise: NoiseConfig,
    skip: SkipList,
    restricted: RestrictedList,
    operator: Vec<String>,
}

impl Normalizer {
    /// Build from the loaded filters and the operator's From patterns
    #[must_use]
    pub fn new(
        noise: NoiseConfig,
        skip: SkipList,
        restricted: RestrictedList,
        operator: Vec<String>,
    ) -> Self {
        Self {
            noise,
            skip,
            restricted,
            operator,
        }
    }

    /// Observations for every usable address on a raw message
    #[must_use]
    pub fn observe(&self, raw: &[u8]) -> MessageOutcome {
        let Some(headers) = MessageHeaders::parse(raw) else {
            return MessageOutcome {
                unparsable: true,
                ..MessageOutcome::default()
            };
        };
        self.observe_headers(&headers)
    }

    /// Observations for already-parsed headers
    #[must_use]
    pub fn observe_headers(&self, headers: &MessageHeaders) -> MessageOutcome {
        let date = headers.date.as_deref().map(canonical_date);
        let sent = is_from_operator(headers.from.as_slice(), &self.operator);
        let direction = Direction::from_sent(sent);

        let mut outcome = MessageOutcome {
            skipped: headers.rejected_headers,
            ..MessageOutcome::default()
        };
        for (raw_name, raw_address) in &headers.addresses {
            match self.observation(raw_name.as_deref(), raw_address, date.as_deref(), direction) {
                Some(observation) => outcome.observations.push(observation),
                None => outcome.skipped += 1,
            }
        }
        outcome
    }

    /// Clean and filter one (name, address) pair
    fn observation(
        &self,
        raw_name: Option<&str>,
        raw_address: &str,
        date: Option<&str>,
        direction: Direction,
    ) -> Option<Observation> {
        if self.noise.is_noise(raw_name.unwrap_or(""), raw_address) {
            trace!("Noise: {raw_name:?} <{raw_address}>");
            return None;
        }

        let address = clean_address(raw_address);
        let name = raw_name
            .and_then(clean_name)
            .filter(|n| n.to_lowercase() != address.to_lowercase());

        if !self.restricted.permits(name.as_deref(), &address) {
            trace!("Restricted: {name:?} <{address}>");
            return None;
        }
        if !address.contains('@') {
            trace!("Not an address: {address:?}");
            return None;
        }
        if self.skip.matches(name.as_deref(), &address) {
            trace!("Skip list: {name:?} <{address}>");
            return None;
        }

        Some(Observation {
            name,
            address,
            date: date.map(str::to_string),
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(
            NoiseConfig::default(),
            SkipList::from_lines("^spam-").unwrap(),
            RestrictedList::from_lines("Karl Fogel <karl@example.com>").unwrap(),
            vec!["jim@x.com".to_string()],
        )
    }

    #[test]
    fn test_sent_message() {
        let raw = b"From jim@x.com Mon Nov  7 10:00:00 2011\n\
From: Jim Smith <jim@x.com>\n\
To: \"Random, Julie\" <julie@y.org>\n\
Date: Mon, 7 Nov 2011 10:00:00 -0500\n\n";
        let outcome = normalizer().observe(raw);
        assert_eq!(outcome.skipped, 0);
        assert_eq!(outcome.observations.len(), 2);

        let julie = &outcome.observations[1];
        assert_eq!(julie.name.as_deref(), Some("Julie Random"));
        assert_eq!(julie.address, "julie@y.org");
        assert_eq!(julie.date.as_deref(), Some("2011 Nov 07"));
        assert_eq!(julie.direction, Direction::Sent);
    }

    #[test]
    fn test_filters_apply() {
        let raw = b"From: Ann <ann@y.org>\n\
To: Cheap Watches <karl@example.com>, Karl Fogel <karl@example.com>, spam-bot@z.com,\n \
 \"ann@y.org\" <ann@y.org>, donotreply@bank.com\n\n";
        let outcome = normalizer().observe(raw);

        let seen: Vec<(Option<&str>, &str)> = outcome
            .observations
            .iter()
            .map(|o| (o.name.as_deref(), o.address.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Some("Ann"), "ann@y.org"),
                (Some("Karl Fogel"), "karl@example.com"),
                (None, "ann@y.org"),
            ]
        );
        assert_eq!(outcome.skipped, 3);
        assert!(outcome
            .observations
            .iter()
            .all(|o| o.direction == Direction::Seen && o.date.is_none()));
    }

    #[test]
    fn test_encoded_reversed_name() {
        let raw = b"From: =?utf-8?q?Random=2C_Julie?= <julie@y.org>\n\
To: =?utf-8?q?Jos=C3=A9_P=C3=A9rez?= <jose@y.org>\n\n";
        let outcome = normalizer().observe(raw);

        let seen: Vec<(Option<&str>, &str)> = outcome
            .observations
            .iter()
            .map(|o| (o.name.as_deref(), o.address.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Some("Julie Random"), "julie@y.org"),
                (Some("Jos\u{e9} P\u{e9}rez"), "jose@y.org"),
            ]
        );
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_unparsable_message() {
        let outcome = normalizer().observe(b"\xff\xfe not a header\n");
        assert!(outcome.observations.is_empty() || outcome.unparsable);
    }
}
