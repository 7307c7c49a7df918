//! Canonical "YYYY Mon DD" dates and their lenient ordering

use std::cmp::Ordering;
use std::ops::Range;

/// Month abbreviations, indexed by month number minus one
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Fixed byte offsets of the fields in a canonical date such as `2011 Nov 07`
const YEAR: Range<usize> = 0..4;
const MONTH: Range<usize> = 5..8;
const DAY: Range<usize> = 9..11;

/// A calendar date encoded as `year * 10000 + month * 100 + day`.
///
/// `DateCode::UNKNOWN` (zero) stands for any date that is missing or not in
/// canonical form, and sorts before every real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateCode(u32);

impl DateCode {
    /// Sentinel for missing or malformed dates
    pub const UNKNOWN: Self = Self(0);

    /// Encode a canonical `YYYY Mon DD` string.
    ///
    /// Never fails: anything that is not exactly four digits, a space, a
    /// month abbreviation, a space and two digits yields [`DateCode::UNKNOWN`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let bytes = text.as_bytes();
        if bytes.len() != 11 || bytes[4] != b' ' || bytes[8] != b' ' {
            return Self::UNKNOWN;
        }

        let year = text.get(YEAR).and_then(strict_digits);
        let month = text.get(MONTH).and_then(month_number);
        let day = text.get(DAY).and_then(strict_digits);

        match (year, month, day) {
            (Some(y), Some(m), Some(d)) => Self(y * 10_000 + m * 100 + d),
            _ => Self::UNKNOWN,
        }
    }

    /// Whether this is a real date rather than the sentinel
    #[must_use]
    pub const fn is_known(self) -> bool {
        self.0 != 0
    }

    /// The raw integer encoding
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<Option<&str>> for DateCode {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Self::UNKNOWN, Self::parse)
    }
}

/// Outcome of comparing two date strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// The first date is strictly later
    FirstLater,
    /// The second date is strictly later
    SecondLater,
    /// Same date, or at least one side could not be decomposed
    Incomparable,
}

/// (year, month, day) pulled out of a date string by fixed-offset slicing
fn fields(text: &str) -> Option<(u32, u32, u32)> {
    let year = lenient_number(slice(text, YEAR))?;
    let month = month_number(slice(text, MONTH))?;
    let day = lenient_number(slice(text, DAY))?;
    Some((year, month, day))
}

/// Slice `range` out of `text`, clamped to its length the way string
/// slicing in most scripting languages behaves. Returns "" when the range
/// falls inside a multi-byte character.
fn slice(text: &str, range: Range<usize>) -> &str {
    let end = range.end.min(text.len());
    let start = range.start.min(end);
    text.get(start..end).unwrap_or("")
}

/// Digits only, no surrounding space
fn strict_digits(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Digits with optional surrounding whitespace, e.g. the `7` in `2014 Apr 7`
fn lenient_number(token: &str) -> Option<u32> {
    strict_digits(token.trim())
}

fn month_number(token: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(token))
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

/// Compare two date strings field by field.
///
/// Both sides are validated before anything is compared, so a malformed year,
/// day or month abbreviation on either side gives [`DateOrder::Incomparable`].
#[must_use]
pub fn compare(a: &str, b: &str) -> DateOrder {
    let (Some(fa), Some(fb)) = (fields(a), fields(b)) else {
        return DateOrder::Incomparable;
    };

    match fa.cmp(&fb) {
        Ordering::Greater => DateOrder::FirstLater,
        Ordering::Less => DateOrder::SecondLater,
        Ordering::Equal => DateOrder::Incomparable,
    }
}

/// Return the later of two optional dates.
///
/// A present date always beats an absent one. When the dates are equal or
/// cannot be compared, `a` is kept.
#[must_use]
pub fn later<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<&'a str> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => match compare(a, b) {
            DateOrder::SecondLater => Some(b),
            DateOrder::FirstLater | DateOrder::Incomparable => Some(a),
        },
    }
}
