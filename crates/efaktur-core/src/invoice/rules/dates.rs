//! Date normalization for e-Faktur documents.
//!
//! Canonical form is `DD/MM/YYYY`. Anything that cannot be brought into that
//! form becomes the empty string.

use super::patterns::DATE_DMY;

/// Locale of a month name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthLocale {
    Indonesian,
    English,
}

impl MonthLocale {
    /// Locales tried when resolving a month name, in order.
    pub const ALL: [MonthLocale; 2] = [MonthLocale::Indonesian, MonthLocale::English];

    fn months(&self) -> &'static [&'static str; 12] {
        match self {
            MonthLocale::Indonesian => &[
                "januari", "februari", "maret", "april", "mei", "juni",
                "juli", "agustus", "september", "oktober", "november", "desember",
            ],
            MonthLocale::English => &[
                "january", "february", "march", "april", "may", "june",
                "july", "august", "september", "october", "november", "december",
            ],
        }
    }
}

const MONTH_CODES: [&str; 12] = [
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12",
];

/// Map a month name to its two-digit code in the given locale.
///
/// Matching ignores case. Unknown names yield `None`.
pub fn month_name_to_number(name: &str, locale: MonthLocale) -> Option<&'static str> {
    let name = name.to_lowercase();
    locale
        .months()
        .iter()
        .position(|m| *m == name)
        .map(|i| MONTH_CODES[i])
}

/// Resolve a month name in any supported locale.
pub fn resolve_month(name: &str) -> Option<&'static str> {
    MonthLocale::ALL
        .iter()
        .find_map(|locale| month_name_to_number(name, *locale))
}

/// Assemble `DD/MM/YYYY` from a day, a two-digit month code, and a year.
///
/// The day is zero-padded. A malformed day or year yields `""`.
pub fn format_date(day: &str, month_number: &str, year: &str) -> String {
    let valid_day = (1..=2).contains(&day.len()) && day.chars().all(|c| c.is_ascii_digit());
    let valid_month = month_number.len() == 2 && month_number.chars().all(|c| c.is_ascii_digit());
    let valid_year = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());

    if !valid_day || !valid_month || !valid_year {
        return String::new();
    }

    format!("{:0>2}/{}/{}", day, month_number, year)
}

/// Convert `"15 Januari 2024"` into `"15/01/2024"`.
///
/// Exactly three whitespace-separated tokens are required; anything else,
/// or an unknown month, yields `""`.
pub fn format_long_date(input: &str) -> String {
    let parts: Vec<&str> = input.split_whitespace().collect();
    let [day, month, year] = parts.as_slice() else {
        return String::new();
    };

    match resolve_month(month) {
        Some(code) => format_date(day, code, year),
        None => String::new(),
    }
}

/// Normalize either a month-name date or a numeric `D/M/YYYY` date.
pub fn normalize_date(input: &str) -> String {
    let trimmed = input.trim().trim_start_matches(',').trim();

    if let Some(caps) = DATE_DMY.captures(trimmed) {
        let month = format!("{:0>2}", &caps[2]);
        let in_range = month
            .parse::<u32>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false);
        if !in_range {
            return String::new();
        }
        return format_date(&caps[1], &month, &caps[3]);
    }

    format_long_date(trimmed)
}
