//! Filter term modifiers and case-insensitive text comparison.

pub const NEGATE_MARKER: char = '!';
pub const EXACT_MARKER: char = '=';

const MODIFIERS: [char; 2] = [NEGATE_MARKER, EXACT_MARKER];

/// A filter term split into its modifiers and the value to compare.
///
/// Only the first two characters of the raw term decide the modifiers, so
/// `!!value` is a plain term and `!=value` / `=!value` are negated exact
/// terms. Every leading modifier character is then stripped from the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterTerm<'a> {
    pub value: &'a str,
    pub negated: bool,
    pub exact: bool,
}

impl<'a> FilterTerm<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let mut chars = raw.chars();
        let first = chars.next();
        let second = chars.next();
        let (negated, exact) = match (first, second) {
            (Some('!'), Some('!')) => (false, false),
            (Some('!'), Some('=')) | (Some('='), Some('!')) => (true, true),
            (Some('!'), _) => (true, false),
            (Some('='), _) => (false, true),
            _ => (false, false),
        };

        Self {
            value: strip_modifiers(raw),
            negated,
            exact,
        }
    }
}

/// Removes every leading `!` and `=` from a raw term.
pub fn strip_modifiers(raw: &str) -> &str {
    raw.trim_start_matches(MODIFIERS)
}

/// Returns true if the raw term has no characters besides modifiers.
pub fn is_modifier_only(raw: &str) -> bool {
    strip_modifiers(raw).is_empty()
}

/// Prefixes `value` with the exact-match marker.
pub fn exact_term(value: &str) -> String {
    format!("{EXACT_MARKER}{value}")
}

/// Prefixes `value` with the negation marker.
pub fn negated_term(value: &str) -> String {
    format!("{NEGATE_MARKER}{value}")
}

/// Case-insensitive substring test. `needle` must already be lowercase.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        let needle = needle.as_bytes();
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle));
    }
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive equality. `expected` must already be lowercase.
pub fn equals_ignore_case(candidate: &str, expected: &str) -> bool {
    if candidate.is_ascii() && expected.is_ascii() {
        return candidate.eq_ignore_ascii_case(expected);
    }
    candidate.to_lowercase() == expected
}
