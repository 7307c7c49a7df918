//! Emacs Lisp address database output
//!
//! Each address becomes one line:
//!
//! ```text
//!  ("jim@x.com" (("Jim Smith <jim@x.com>" "2011 Nov 07" 1 0) ("jim@x.com" "N/A" 0 0)))
//! ```
//!
//! where the numbers are the sent and seen counts of each variant.

use crate::book::AddressHistory;
use crate::error::Result;
use std::io::Write;

/// Quote `s` as an elisp string literal
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Render one address as an elisp form
#[must_use]
pub fn render_history(history: &AddressHistory) -> String {
    let mut line = format!(" ({} (", quote(history.canonical()));
    for (i, (display, variant)) in history.sorted_variants().into_iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(&format!(
            "({} {} {} {})",
            quote(display),
            quote(variant.last_seen.as_deref().unwrap_or(super::UNKNOWN_DATE)),
            variant.sent_count,
            variant.seen_count
        ));
    }
    line.push_str("))");
    line
}

/// Write one line per history
///
/// # Errors
/// Returns an error if writing fails.
pub fn write_histories<'a, W: Write>(
    sink: &mut W,
    histories: impl IntoIterator<Item = &'a AddressHistory>,
) -> Result<()> {
    for history in histories {
        writeln!(sink, "{}", render_history(history))?;
    }
    Ok(())
}
