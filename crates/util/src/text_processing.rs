//! # Text Processing Utilities
//!
//! Case-insensitive matching used by catalog search and match highlighting,
//! plus the leading-integer reader used when coercing numeric form fields.

use std::ops::Range;

/// Returns true when `needle` occurs in `haystack`, ignoring case.
///
/// An empty needle matches every haystack.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Finds every non-overlapping, case-insensitive occurrence of `needle` in
/// `haystack` and returns their byte ranges in `haystack`.
///
/// Ranges always fall on character boundaries of the original string, so they
/// can be used to slice it for highlighting.
pub fn match_ranges_ignore_case(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let needle_lower: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle_lower.is_empty() {
        return Vec::new();
    }

    let mut ranges = Vec::new();
    let mut search_from = 0;
    for (start, _) in haystack.char_indices() {
        if start < search_from {
            continue;
        }
        if let Some(end) = match_at(haystack, start, &needle_lower) {
            ranges.push(start..end);
            search_from = end;
        }
    }
    ranges
}

fn match_at(haystack: &str, start: usize, needle_lower: &[char]) -> Option<usize> {
    let mut position = 0;
    for (offset, character) in haystack[start..].char_indices() {
        for lowered in character.to_lowercase() {
            if needle_lower.get(position) != Some(&lowered) {
                return None;
            }
            position += 1;
        }
        if position == needle_lower.len() {
            return Some(start + offset + character.len_utf8());
        }
    }
    None
}

/// Reads a leading base-10 integer the way browsers read numeric form input:
/// leading whitespace is skipped, an optional sign is honoured, digits are
/// consumed until the first non-digit and the rest is ignored.
///
/// Returns `None` when no digit follows the optional sign, or when the
/// digits overflow an `i64`.
///
/// ```rust
/// use sprout_util::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix(" 12"), Some(12));
/// assert_eq!(parse_int_prefix("12h"), Some(12));
/// assert_eq!(parse_int_prefix("-3.7"), Some(-3));
/// assert_eq!(parse_int_prefix("twelve"), None);
/// assert_eq!(parse_int_prefix(""), None);
/// ```
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_count = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }

    let digits = &unsigned[..digit_count];
    let magnitude: i64 = if negative {
        format!("-{digits}").parse().ok()?
    } else {
        digits.parse().ok()?
    };
    Some(magnitude)
}
