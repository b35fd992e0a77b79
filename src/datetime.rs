//! Date/Time Helpers
//!
//! Parsing and formatting for the string formats used by form inputs
//! (`YYYY-MM-DD`, `HH:MM`, `YYYY-MM-DDTHH:MM`) and by the server.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date (`YYYY-MM-DD`, extra time part ignored)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Parse a time of day (`HH:MM` or `HH:MM:SS`)
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Parse a datetime in any of the accepted local formats.
///
/// RFC 3339 values with an offset are reduced to their local wall-clock time.
/// A bare date is read as midnight.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    if value.len() == 10 {
        return parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    None
}

/// `HH:MM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Value for a `datetime-local` input; seconds are kept when non-zero
pub fn format_input_datetime(value: NaiveDateTime) -> String {
    if value.second() == 0 {
        value.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Whether `value` is already accepted as-is by a `datetime-local` input
pub fn is_input_datetime(value: &str) -> bool {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
}

/// Human-readable `DD/MM/YYYY HH:MM`
pub fn format_display_datetime(value: NaiveDateTime) -> String {
    value.format("%d/%m/%Y %H:%M").to_string()
}

/// Human-readable `DD/MM/YYYY`
pub fn format_display_date(value: NaiveDate) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// Reformat a server datetime for display, falling back to the raw text
pub fn display_datetime(raw: &str) -> String {
    parse_datetime(raw)
        .map(format_display_datetime)
        .unwrap_or_else(|| raw.to_string())
}

/// Trim a `HH:MM:SS` value to `HH:MM`
pub fn short_time(raw: &str) -> String {
    parse_time(raw).map(format_time).unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_datetime("2024-03-01T09:30"), Some(expected));
        assert_eq!(parse_datetime("2024-03-01 09:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-03-01T09:30:00+01:00"), Some(expected));
        assert_eq!(parse_datetime("2024-03-01"), expected.date().and_hms_opt(0, 0, 0));
        assert_eq!(parse_datetime("demain"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn test_input_datetime_keeps_seconds() {
        let at = |s| NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(9, 0, s).unwrap();
        assert_eq!(format_input_datetime(at(0)), "2024-03-05T09:00");
        assert_eq!(format_input_datetime(at(30)), "2024-03-05T09:00:30");
        assert!(is_input_datetime("2024-03-05T09:00:30"));
        assert!(!is_input_datetime("2024-03-05 09:00:30"));
    }

    #[test]
    fn test_times() {
        assert_eq!(short_time("08:15:00"), "08:15");
        assert_eq!(short_time("n/a"), "n/a");
        assert!(parse_time("25:00").is_none());
    }

    #[test]
    fn test_display_datetime() {
        assert_eq!(display_datetime("2024-03-01T09:00:00"), "01/03/2024 09:00");
        assert_eq!(display_datetime("bientôt"), "bientôt");
    }
}
