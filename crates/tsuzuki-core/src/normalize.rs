//! Title normalization used when no override exists.
//!
//! Two titles are considered equal when they match after Unicode NFKC,
//! case folding, and whitespace collapse. Punctuation is kept on purpose:
//! "Re:Zero" and "ReZero" are different titles here.

use unicode_normalization::UnicodeNormalization;

/// Normalize a title for exact comparison.
pub fn normalize(s: &str) -> String {
    let s = unicode_normalize(s);
    collapse_whitespace(&s)
}

/// Apply NFKC normalization (fullwidth → ASCII, compose diacritics) and lowercase.
fn unicode_normalize(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

/// Trim and collapse multiple whitespace runs to a single space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// English ordinal for `n` ("1st", "2nd", "3rd", "11th", ...).
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
