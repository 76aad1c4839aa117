// Parsing and formatting helpers.
//
// CSV cleanup lives here so the loader can work with typed values, and the
// display formatting shared by the metric cards and the tables lives here so
// every front end renders numbers the same way.
use num_format::{Locale, ToFormattedString};

/// Trim a text field, treating blank values as missing.
pub fn clean_text(s: Option<String>) -> Option<String> {
    let s = s?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_year_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

/// Parse a numeric CSV cell leniently.
///
/// Thousands separators are stripped and anything containing letters is
/// rejected, so `"1,250,000"` and `"1250000.0"` parse while `"n/a"` does not.
pub fn parse_number_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() || s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok()
}

/// Arithmetic mean of integer totals; 0 for an empty slice.
pub fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().sum();
    sum as f64 / values.len() as f64
}

/// Compact rendering of large quantities: `2.5M`, `2K`, `500`.
///
/// Thresholds are checked against the value as it will be rounded, so
/// `999.6` renders as `1K` and `999_600` as `1.0M`.
pub fn format_number(n: f64) -> String {
    if (n / 1_000.0).round() >= 1_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else if n.round() >= 1_000.0 {
        format!("{:.0}K", n / 1_000.0)
    } else {
        format!("{:.0}", n)
    }
}

pub fn format_percent(p: f64) -> String {
    format!("{:.1}%", p)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // `1234567` -> `1,234,567`
    n.to_formatted_string(&Locale::en)
}
