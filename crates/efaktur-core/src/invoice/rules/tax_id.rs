//! NPWP (Indonesian taxpayer ID) and serial-number normalization.
//!
//! Both functions return `0` when no digits survive; `0` is the
//! "not found" sentinel for every integer field of the record.

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip exactly one leading `"00"` or, failing that, one leading `"0"`.
pub fn strip_leading_zero_group(digits: &str) -> &str {
    if let Some(rest) = digits.strip_prefix("00") {
        rest
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits
    }
}

/// Normalize an NPWP to an integer.
///
/// `"01.234.567.8-901.000"` becomes `12345678901000`. Inputs with no digits,
/// or with more digits than fit in a `u64`, yield `0`.
pub fn normalize_tax_id(s: &str) -> u64 {
    let digits = digits_only(s);
    strip_leading_zero_group(&digits).parse().unwrap_or(0)
}

/// Widest digit run that always fits in a `u64`.
pub const MAX_U64_DIGITS: usize = 19;

/// The trailing `n` digits of `s` as an integer.
///
/// Used for invoice serial codes, where only the last 12 digits identify
/// the invoice. `n` is capped at [`MAX_U64_DIGITS`].
pub fn last_digits(s: &str, n: usize) -> u64 {
    let digits = digits_only(s);
    let start = digits.len().saturating_sub(n.min(MAX_U64_DIGITS));
    digits[start..].parse().unwrap_or(0)
}
