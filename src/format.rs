//! Display formatting for amounts and dates as they appear on a Belgian
//! claim form.

use chrono::{Datelike, NaiveDate};

const DUTCH_MONTHS: [&str; 12] = [
    "januari",
    "februari",
    "maart",
    "april",
    "mei",
    "juni",
    "juli",
    "augustus",
    "september",
    "oktober",
    "november",
    "december",
];

/// Parse an amount typed with either `.` or `,` as decimal separator.
///
/// Returns `None` for blank or non-numeric input.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.replacen(',', ".", 1).parse().ok()?;
    value.is_finite().then_some(value)
}

/// Format a numeric amount with two decimals and a decimal comma.
pub fn format_euro_number(value: f64) -> String {
    // avoid "-0,00"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value:.2}").replace('.', ",")
}

/// Format a textual amount with two decimals and a decimal comma.
///
/// Input that does not parse as a number is returned unchanged.
pub fn format_euro(value: &str) -> String {
    match parse_amount(value) {
        Some(amount) => format_euro_number(amount),
        None if value.trim().is_empty() => String::new(),
        None => value.to_string(),
    }
}

/// Dutch month name (lowercase) for a 1-based month number.
pub fn dutch_month_name(month: u32) -> Option<&'static str> {
    DUTCH_MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Long Dutch (Belgian) date, e.g. `16 oktober 2026`.
pub fn format_date_dutch(date: NaiveDate) -> String {
    let month = dutch_month_name(date.month()).unwrap_or_default();
    format!("{} {} {}", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euro_from_comma_string() {
        assert_eq!(format_euro("12,5"), "12,50");
        assert_eq!(format_euro("12.5"), "12,50");
        assert_eq!(format_euro(" 7 "), "7,00");
    }

    #[test]
    fn euro_from_number() {
        assert_eq!(format_euro_number(0.0), "0,00");
        assert_eq!(format_euro_number(-0.0), "0,00");
        assert_eq!(format_euro_number(1234.567), "1234,57");
    }

    #[test]
    fn euro_passthrough_on_garbage() {
        assert_eq!(format_euro("abc"), "abc");
        assert_eq!(format_euro("inf"), "inf");
        assert_eq!(format_euro(""), "");
    }

    #[test]
    fn parse_amount_rejects_blank_and_text() {
        assert_eq!(parse_amount("  "), None);
        assert_eq!(parse_amount("twelve"), None);
        assert_eq!(parse_amount("3,25"), Some(3.25));
    }

    #[test]
    fn dutch_long_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();
        assert_eq!(format_date_dutch(date), "6 oktober 2026");
        let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(format_date_dutch(date), "31 maart 2025");
    }

    #[test]
    fn month_names_are_bounded() {
        assert_eq!(dutch_month_name(1), Some("januari"));
        assert_eq!(dutch_month_name(12), Some("december"));
        assert_eq!(dutch_month_name(0), None);
        assert_eq!(dutch_month_name(13), None);
    }
}
