//! Cleanup of raw header text before it reaches the address book

mod pipeline;

pub use pipeline::{MessageOutcome, Normalizer};

use chrono::DateTime;
use regex::Regex;
use std::sync::LazyLock;

/// Unquoted "Last, First" names. Anchored at both ends: "Random, Julie Q"
/// stays as written, since a partial rewrite would drop the trailing tokens.
static REVERSED_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^, ]+), +([^, ]+)$").expect("Invalid REVERSED_NAME_REGEX pattern")
});

/// Suffix added by Google services, e.g. "Jane Random (via Google Drive)"
const GOOGLE_SUFFIX: &str = " (via Google ";

/// Weekday prefixes stripped from unparsable dates
const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Placeholder for a year that could not be recovered
const UNKNOWN_YEAR: &str = "(YYYY?)";

/// Tidy a display name; `None` if nothing is left.
///
/// Strips whitespace and surrounding quotes, turns `Last, First` into
/// `First Last`, folds line breaks into spaces and drops Google's
/// `(via Google ...)` suffix.
#[must_use]
pub fn clean_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches(|c| c == '\'' || c == '"');
    if trimmed.is_empty() {
        return None;
    }

    let mut name = REVERSED_NAME_REGEX.captures(trimmed).map_or_else(
        || trimmed.to_string(),
        |caps| format!("{} {}", &caps[2], &caps[1]),
    );

    if name.contains('\n') || name.contains('\r') {
        name = name
            .replace("\r\n", "\n")
            .replace("\n ", " ")
            .replace(['\n', '\r'], " ");
    }

    if let Some(idx) = name.find(GOOGLE_SUFFIX) {
        name.truncate(idx);
    }

    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Tidy an address: no surrounding whitespace or angle brackets, no quotes
#[must_use]
pub fn clean_address(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '<' || c == '>')
        .replace(['"', '\''], "")
}

/// Reduce a `Date` header to `YYYY Mon DD`.
///
/// RFC 2822 dates are rendered in their own offset. Anything else goes
/// through a best-effort reshuffle of the tokens before the time of day; if
/// even that finds nothing, the text is returned with weekdays removed.
#[must_use]
pub fn canonical_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return parsed.format("%Y %b %d").to_string();
    }
    fallback_date(raw)
}

fn fallback_date(raw: &str) -> String {
    let mut date = raw.to_string();
    for day in WEEKDAYS {
        date = date.replace(&format!("{day}, "), "");
    }

    let Some(colon) = date.find(':') else {
        return date;
    };
    let Some(space) = date[..colon].rfind(' ').filter(|&idx| idx > 0) else {
        return date;
    };

    let tokens: Vec<&str> = date[..space].split_whitespace().collect();
    match tokens.as_slice() {
        [] => date.clone(),
        [only] => format!("{only} {UNKNOWN_YEAR}"),
        [day, month] => format!("{month} {day} {UNKNOWN_YEAR}"),
        [day, month, year, ..] => format!("{year} {month} {day}"),
    }
}

/// Whether any `From` value names the operator
#[must_use]
pub fn is_from_operator<S: AsRef<str>>(from_values: &[S], operator: &[String]) -> bool {
    from_values.iter().any(|from| {
        operator
            .iter()
            .any(|needle| !needle.is_empty() && from.as_ref().contains(needle.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("  Jim Smith "), Some("Jim Smith".into()));
        assert_eq!(clean_name("\"'J. Random'\""), Some("J. Random".into()));
        assert_eq!(clean_name("  \"\" "), None);
        assert_eq!(clean_name(""), None);
    }

    #[test]
    fn test_clean_name_reversed() {
        assert_eq!(clean_name("Random, Julie"), Some("Julie Random".into()));
        assert_eq!(clean_name("Random,   Julie"), Some("Julie Random".into()));
        assert_eq!(
            clean_name("Random, Julie Q"),
            Some("Random, Julie Q".into())
        );
    }

    #[test]
    fn test_clean_name_newlines_and_google() {
        assert_eq!(clean_name("Jim\n Smith"), Some("Jim Smith".into()));
        assert_eq!(clean_name("Jim\r\nSmith"), Some("Jim Smith".into()));
        assert_eq!(
            clean_name("Jane Random (via Google Drive)"),
            Some("Jane Random".into())
        );
        assert_eq!(clean_name("(via Google Docs)"), Some("(via Google Docs)".into()));
    }

    #[test]
    fn test_clean_address() {
        assert_eq!(clean_address(" <jim@x.com> "), "jim@x.com");
        assert_eq!(clean_address("\"jason wishnow\"@evil-wire.org"), "jason wishnow@evil-wire.org");
        assert_eq!(clean_address("o'brien@x.ie"), "obrien@x.ie");
    }

    #[test]
    fn test_canonical_date_rfc2822() {
        assert_eq!(canonical_date("Mon, 17 Aug 2007 17:37:33 -0700"), "2007 Aug 17");
        assert_eq!(canonical_date("7 Nov 2011 10:00:00 +0000"), "2011 Nov 07");
    }

    #[test]
    fn test_canonical_date_fallback() {
        assert_eq!(canonical_date("Sat, 21 6 9:12:28-0500"), "6 21 (YYYY?)");
        assert_eq!(canonical_date("Sat, 21 Aug 1999 9:12:28 GMT+2"), "1999 Aug 21");
        assert_eq!(canonical_date("21 9:12"), "21 (YYYY?)");
        assert_eq!(canonical_date("sometime last week"), "sometime last week");
        assert_eq!(canonical_date("9:12"), "9:12");
    }

    #[test]
    fn test_is_from_operator() {
        let me = vec!["kfogel@".to_string()];
        assert!(is_from_operator(&["Karl <kfogel@red-bean.com>"], &me));
        assert!(!is_from_operator(&["Jim <jim@x.com>"], &me));
        assert!(!is_from_operator::<&str>(&[], &me));
        assert!(!is_from_operator(&["Jim <jim@x.com>"], &[String::new()]));
    }
}
