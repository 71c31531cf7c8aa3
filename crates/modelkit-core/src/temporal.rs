//! # Lenient Date Parsing
//!
//! Dates inside a [`Value`](crate::Value) are always `DateTime<Utc>`.
//! Input arrives as text or as epoch milliseconds; this module turns both
//! into UTC instants and renders them back.
//!
//! ## Accepted text forms
//!
//! - RFC 3339 with any offset (`2026-01-15T17:00:00+05:00`), converted to UTC.
//! - `YYYY-MM-DD HH:MM[:SS[.fff]]` and the same with a `T` separator,
//!   interpreted as UTC.
//! - `YYYY-MM-DD`, `YYYY/MM/DD` and `DD.MM.YYYY`, at midnight UTC.
//!
//! Anything else, including the empty string, yields `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse a date from text. Returns `None` for empty or unrecognized input.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

/// Build a date from milliseconds since the Unix epoch.
///
/// Fractional milliseconds are dropped. Non-finite or out-of-range values
/// yield `None`.
pub fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let millis = millis.trunc();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Render a date as RFC 3339 with millisecond precision and a `Z` suffix
/// (e.g., `2026-01-15T12:00:00.000Z`).
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_converts_offset() {
        let dt = parse_date("2026-01-15T17:00:00+05:00").unwrap();
        assert_eq!(dt, utc(2026, 1, 15, 12, 0, 0));
    }

    #[test]
    fn test_parse_z_suffix() {
        assert_eq!(
            parse_date("2026-01-15T12:00:00Z").unwrap(),
            utc(2026, 1, 15, 12, 0, 0)
        );
    }

    #[test]
    fn test_parse_naive_datetime_is_utc() {
        assert_eq!(
            parse_date("2026-01-15 08:30:05").unwrap(),
            utc(2026, 1, 15, 8, 30, 5)
        );
        assert_eq!(
            parse_date("2026-01-15T08:30").unwrap(),
            utc(2026, 1, 15, 8, 30, 0)
        );
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let dt = parse_date("2026-01-15 08:30:05.250").unwrap();
        assert_eq!(dt.nanosecond(), 250_000_000);
    }

    #[test]
    fn test_parse_date_only_forms() {
        let midnight = utc(2026, 3, 7, 0, 0, 0);
        assert_eq!(parse_date("2026-03-07").unwrap(), midnight);
        assert_eq!(parse_date("2026/03/07").unwrap(), midnight);
        assert_eq!(parse_date("07.03.2026").unwrap(), midnight);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_date("").is_none());
        assert!(parse_date("   ").is_none());
        assert!(parse_date("not-a-date").is_none());
        assert!(parse_date("2026-13-45").is_none());
    }

    #[test]
    fn test_epoch_millis() {
        let dt = from_epoch_millis(1_768_478_400_000.0).unwrap();
        assert_eq!(dt, utc(2026, 1, 15, 12, 0, 0));
        assert_eq!(from_epoch_millis(0.0).unwrap(), utc(1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_epoch_millis_rejects_non_finite() {
        assert!(from_epoch_millis(f64::NAN).is_none());
        assert!(from_epoch_millis(f64::INFINITY).is_none());
        assert!(from_epoch_millis(1e300).is_none());
    }

    #[test]
    fn test_format_roundtrip() {
        let dt = utc(2026, 6, 30, 23, 59, 59);
        let text = format_date(&dt);
        assert_eq!(text, "2026-06-30T23:59:59.000Z");
        assert_eq!(parse_date(&text).unwrap(), dt);
    }
}
