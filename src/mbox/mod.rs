//! Splitting an mbox stream into messages and reading their address headers

mod header;

pub use header::MessageHeaders;

use std::io::{self, BufRead};

/// Line prefixes that start a new message
const MESSAGE_STARTS: [&[u8]; 2] = [b"From ", b"X-From-Line: "];

/// Iterator over the raw messages of an mbox stream.
///
/// Messages are returned as bytes, envelope line included. Anything before
/// the first envelope line is returned as a message of its own if non-empty.
pub struct MessageSplitter<R> {
    reader: R,
    /// Envelope line that opened the message currently being collected
    pending: Option<Vec<u8>>,
    done: bool,
}

impl<R: BufRead> MessageSplitter<R> {
    /// Wrap a buffered reader
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            pending: None,
            done: false,
        }
    }

    fn is_message_start(line: &[u8]) -> bool {
        MESSAGE_STARTS.iter().any(|start| line.starts_with(start))
    }

    fn next_message(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut message = self.pending.take().unwrap_or_default();
        let mut line = Vec::new();

        loop {
            line.clear();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                self.done = true;
                return Ok((!message.is_empty()).then_some(message));
            }

            if Self::is_message_start(&line) && !message.is_empty() {
                self.pending = Some(line);
                return Ok(Some(message));
            }
            message.extend_from_slice(&line);
        }
    }
}

impl<R: BufRead> Iterator for MessageSplitter<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_message() {
            Ok(Some(message)) => Some(Ok(message)),
            Ok(None) => None,
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<String> {
        MessageSplitter::new(input.as_bytes())
            .map(|m| String::from_utf8(m.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_split_two_messages() {
        let input = "From a@x.com Mon Aug 17 17:37:33 2007\nSubject: one\n\nbody\n\
                     From b@x.com Tue Aug 18 10:00:00 2007\nSubject: two\n\nbody two\n";
        let messages = split(input);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("From a@x.com"));
        assert!(messages[0].contains("Subject: one"));
        assert!(messages[1].starts_with("From b@x.com"));
        assert!(messages[1].ends_with("body two\n"));
    }

    #[test]
    fn test_split_gnus_envelope() {
        let input = "X-From-Line: a@x.com\nFrom: A <a@x.com>\n\nhi\nX-From-Line: b@x.com\nFrom: b@x.com\n\n";
        let messages = split(input);
        assert_eq!(messages.len(), 2);
        assert!(messages[1].starts_with("X-From-Line: b@x.com"));
    }

    #[test]
    fn test_header_named_from_does_not_split() {
        let input = "From a@x.com Mon Aug 17 17:37:33 2007\nFrom: A <a@x.com>\nTo: b@x.com\n\n";
        assert_eq!(split(input).len(), 1);
    }

    #[test]
    fn test_leading_garbage_and_missing_newline() {
        let input = "stray line\nFrom a@x.com date\nTo: b@x.com";
        let messages = split(input);
        assert_eq!(messages, vec!["stray line\n", "From a@x.com date\nTo: b@x.com"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split("").is_empty());
    }

    #[test]
    fn test_non_utf8_is_kept() {
        let input: &[u8] = b"From a@x.com\nSubject: \xff\xfe\n\n";
        let messages: Vec<Vec<u8>> = MessageSplitter::new(input).map(Result::unwrap).collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0], input);
    }
}
