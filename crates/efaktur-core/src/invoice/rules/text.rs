//! Whitespace and party-name cleanup.

use super::patterns::{NAME_LABEL, TRAILING_DIGITS, WHITESPACE};

/// Collapse whitespace runs to a single space and trim both ends.
///
/// Absent input stays absent: use `Option::map` on optional candidates.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Remove a trailing run of digits (OCR bleed from an adjacent field).
pub fn strip_numeric_suffix(s: &str) -> String {
    TRAILING_DIGITS.replace(s, "").trim().to_string()
}

/// Clean a matched `Nama :` line into a party name.
pub fn clean_party_name(candidate: &str) -> String {
    let normalized = normalize_whitespace(candidate);
    let without_label = NAME_LABEL.replace(&normalized, "");
    strip_numeric_suffix(&without_label)
}
