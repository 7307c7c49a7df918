//! Address and date headers of a single message

use log::debug;
use mailparse::{addrparse_header, MailAddr, MailHeader, MailHeaderMap};

/// Headers whose values are address lists, in extraction order
const ADDRESS_HEADERS: [&str; 4] = ["From", "To", "Cc", "Bcc"];

/// A raw (display name, address) pair
pub type AddressPair = (Option<String>, String);

/// The headers mailbook cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeaders {
    /// Every `From` value, decoded to text
    pub from: Vec<String>,
    /// First `Date` value
    pub date: Option<String>,
    /// Every address on From, To, Cc and Bcc, in that order
    pub addresses: Vec<AddressPair>,
    /// Address headers that could not be parsed as address lists
    pub rejected_headers: usize,
}

impl MessageHeaders {
    /// Parse the header block of a raw message.
    ///
    /// A leading mbox envelope (`From ...`) line is skipped. Returns `None`
    /// when the header block cannot be parsed at all.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Option<Self> {
        let body = strip_envelope(raw);
        let (headers, _) = match mailparse::parse_headers(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Unparsable header block: {e}");
                return None;
            }
        };

        let mut parsed = Self {
            from: headers.get_all_values("From"),
            date: headers.get_first_value("Date"),
            ..Self::default()
        };
        for key in ADDRESS_HEADERS {
            for header in headers.get_all_headers(key) {
                parsed.push_address_list(header);
            }
        }
        Some(parsed)
    }

    /// Add every address of one header. Encoded words in display names are
    /// decoded after the list is split, so a decoded comma or quote cannot
    /// break the list apart. Group syntax is flattened.
    fn push_address_list(&mut self, header: &MailHeader) {
        let list = match addrparse_header(header) {
            Ok(list) => list,
            Err(e) => {
                debug!("Skipping unparsable {} header: {e}", header.get_key());
                self.rejected_headers += 1;
                return;
            }
        };
        for addr in list.iter() {
            match addr {
                MailAddr::Single(info) => {
                    self.addresses.push((info.display_name.clone(), info.addr.clone()));
                }
                MailAddr::Group(group) => {
                    for info in &group.addrs {
                        self.addresses.push((info.display_name.clone(), info.addr.clone()));
                    }
                }
            }
        }
    }
}

/// Drop a leading `From ` envelope line, which is not a header
fn strip_envelope(raw: &[u8]) -> &[u8] {
    if !raw.starts_with(b"From ") {
        return raw;
    }
    raw.iter()
        .position(|&b| b == b'\n')
        .map_or(&[][..], |idx| &raw[idx + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &[u8] = b"From jim@x.com Mon Nov  7 10:00:00 2011\n\
From: Jim Smith <jim@x.com>\n\
To: \"Random, Julie\" <julie@y.org>, bob@z.net\n\
Cc: Team: ann@x.com, Carl <carl@x.com>;\n\
Date: Mon, 7 Nov 2011 10:00:00 -0500\n\
Subject: hello\n\
\n\
body text\n";

    #[test]
    fn test_parse_headers() {
        let headers = MessageHeaders::parse(MESSAGE).unwrap();
        assert_eq!(headers.from, vec!["Jim Smith <jim@x.com>"]);
        assert_eq!(headers.addresses.len(), 5);
        assert_eq!(headers.rejected_headers, 0);
        assert_eq!(
            headers.date.as_deref(),
            Some("Mon, 7 Nov 2011 10:00:00 -0500")
        );
    }

    #[test]
    fn test_addresses_in_header_order() {
        let headers = MessageHeaders::parse(MESSAGE).unwrap();
        let pairs = &headers.addresses;
        let addrs: Vec<&str> = pairs.iter().map(|(_, a)| a.as_str()).collect();
        assert_eq!(
            addrs,
            vec!["jim@x.com", "julie@y.org", "bob@z.net", "ann@x.com", "carl@x.com"]
        );
        assert_eq!(pairs[0].0.as_deref(), Some("Jim Smith"));
        assert_eq!(pairs[1].0.as_deref(), Some("Random, Julie"));
        assert_eq!(pairs[2].0, None);
    }

    #[test]
    fn test_strip_envelope() {
        assert_eq!(strip_envelope(b"From x\nTo: y\n"), b"To: y\n");
        assert_eq!(strip_envelope(b"From x"), b"");
        assert_eq!(strip_envelope(b"To: y\n"), b"To: y\n");
    }

    #[test]
    fn test_message_without_addresses() {
        let headers = MessageHeaders::parse(b"Subject: nothing\n\nbody\n").unwrap();
        assert!(headers.addresses.is_empty());
        assert_eq!(headers.date, None);
    }

    #[test]
    fn test_encoded_display_names() {
        let raw = b"From: =?utf-8?q?Random=2C_Julie?= <julie@y.org>\n\
To: =?utf-8?q?Jos=C3=A9_P=C3=A9rez?= <jose@y.org>\n\n";
        let headers = MessageHeaders::parse(raw).unwrap();
        assert_eq!(
            headers.addresses,
            vec![
                (Some("Random, Julie".to_string()), "julie@y.org".to_string()),
                (Some("Jos\u{e9} P\u{e9}rez".to_string()), "jose@y.org".to_string()),
            ]
        );
        assert_eq!(headers.rejected_headers, 0);
    }
}
