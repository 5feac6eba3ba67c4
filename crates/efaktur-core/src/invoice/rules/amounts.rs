//! Amount parsing for Indonesian and machine-formatted notation.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Notation an amount string is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountNotation {
    /// `1.234.567,89`: dot thousands, comma decimal.
    Indonesian,
    /// `1234567.89`, as emitted by the reference provider.
    Machine,
}

/// Parse an Indonesian-formatted amount (e.g. `"1.234.567,89"`).
///
/// Dots are removed, the first comma becomes the decimal point, and the
/// longest numeric prefix is parsed. Never fails: unparsable input is `0`.
pub fn normalize_currency(s: &str) -> Decimal {
    let cleaned = s.replace('.', "").replacen(',', ".", 1);
    leading_decimal(cleaned.trim())
}

/// Parse an amount in the given notation. Unparsable input is `0`.
pub fn parse_amount(s: &str, notation: AmountNotation) -> Decimal {
    match notation {
        AmountNotation::Indonesian => normalize_currency(s),
        AmountNotation::Machine => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            leading_decimal(&cleaned)
        }
    }
}

/// Parse the longest prefix of digits with at most one decimal point.
fn leading_decimal(s: &str) -> Decimal {
    let mut seen_point = false;
    let prefix: String = s
        .chars()
        .take_while(|c| {
            if c.is_ascii_digit() {
                true
            } else if *c == '.' && !seen_point {
                seen_point = true;
                true
            } else {
                false
            }
        })
        .collect();

    let prefix = prefix.trim_end_matches('.');
    if prefix.is_empty() {
        return Decimal::ZERO;
    }

    let prefix = if prefix.starts_with('.') {
        format!("0{}", prefix)
    } else {
        prefix.to_string()
    };

    Decimal::from_str(&prefix).unwrap_or(Decimal::ZERO)
}
