//! Picking the better-capitalized of two spellings of the same text

/// What a string is being compared as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Display names favour capitals
    Name,
    /// Addresses favour lower case
    Address,
}

/// At least one cased character, and none of them lowercase
fn is_all_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// At least one cased character, and none of them uppercase
fn is_all_lower(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

fn starts_upper(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

/// Pick between `a` and `b` given a signal that singles out one of them.
///
/// `a_flag`/`b_flag` say which side has the "capitalized" trait. Names take
/// the flagged side, addresses the other one.
fn pick<'a>(a: &'a str, b: &'a str, a_flag: bool, role: Role) -> &'a str {
    match (role, a_flag) {
        (Role::Name, true) | (Role::Address, false) => a,
        (Role::Name, false) | (Role::Address, true) => b,
    }
}

/// Return the case-preferred spelling of `a` and `b`.
///
/// Rules, first match wins:
/// 1. same case shape (both all-upper or both all-lower): names keep `a`,
///    addresses take `b`;
/// 2. exactly one starts with an uppercase letter: names take it, addresses
///    take the other;
/// 3. exactly one is all-uppercase: names take it, addresses take the other;
/// 4. otherwise `a`.
#[must_use]
pub fn prefer<'a>(a: &'a str, b: &'a str, role: Role) -> &'a str {
    let (a_upper, b_upper) = (is_all_upper(a), is_all_upper(b));

    if (a_upper && b_upper) || (is_all_lower(a) && is_all_lower(b)) {
        return match role {
            Role::Name => a,
            Role::Address => b,
        };
    }

    let (a_first, b_first) = (starts_upper(a), starts_upper(b));
    if a_first != b_first {
        return pick(a, b, a_first, role);
    }

    if a_upper != b_upper {
        return pick(a, b, a_upper, role);
    }

    a
}

/// Case-preferred display name; an absent name loses to a present one
#[must_use]
pub fn prefer_name<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<&'a str> {
    match (a, b) {
        (Some(a), Some(b)) => Some(prefer(a, b, Role::Name)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Case-preferred address spelling
#[must_use]
pub fn prefer_address<'a>(a: &'a str, b: &'a str) -> &'a str {
    prefer(a, b, Role::Address)
}
