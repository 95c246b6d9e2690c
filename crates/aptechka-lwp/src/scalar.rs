//! Scalar conversions used by the positional slots.
//!
//! Dates travel as 8-digit `YYYYMMDD` day codes, timestamps as whole
//! seconds since the Unix epoch.

use aptechka_record::Value;
use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Length of a day code in characters.
pub const DAY_CODE_LEN: usize = 8;

/// Format a calendar date as a `YYYYMMDD` day code.
///
/// Returns `None` for years that do not fit in four digits.
pub fn format_day_code(date: NaiveDate) -> Option<String> {
    if !(0..=9999).contains(&date.year()) {
        return None;
    }
    Some(format!(
        "{:04}{:02}{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

/// Convert a date-like value into a day code.
///
/// Accepts a date, a timestamp (its UTC calendar day), or a string in
/// `YYYY-MM-DD` or RFC 3339 form. Anything else yields `None`.
pub fn date_to_day_code(value: &Value) -> Option<String> {
    date_from_value(value).and_then(format_day_code)
}

/// Parse a `YYYYMMDD` day code.
///
/// Rejects anything that is not exactly eight ASCII digits and any triple
/// that is not a real calendar day (`20230229`, `20241301`, `20240132`).
pub fn day_code_to_date(code: &str) -> Option<NaiveDate> {
    if code.len() != DAY_CODE_LEN || !code.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let year: i32 = code.get(0..4)?.parse().ok()?;
    let month: u32 = code.get(4..6)?.parse().ok()?;
    let day: u32 = code.get(6..8)?.parse().ok()?;

    // Re-derive and compare so no normalization can slip through.
    NaiveDate::from_ymd_opt(year, month, day)
        .filter(|date| date.year() == year && date.month() == month && date.day() == day)
}

/// Whole seconds since the Unix epoch, rounded toward negative infinity.
pub fn timestamp_to_epoch_seconds(timestamp: &DateTime<Utc>) -> i64 {
    timestamp.timestamp()
}

/// Convert epoch seconds back into a UTC timestamp.
pub fn epoch_seconds_to_timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

/// Interpret a record value as a calendar date.
pub fn date_from_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Timestamp(ts) => Some(ts.date_naive()),
        Value::String(text) => parse_date_text(text.trim()),
        _ => None,
    }
}

/// Interpret a record value as a UTC timestamp.
///
/// A bare `YYYY-MM-DD` string or a date value means UTC midnight.
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Timestamp(ts) => Some(*ts),
        Value::Date(date) => date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()),
        Value::String(text) => parse_timestamp_text(text.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp_text(text).map(|ts| ts.date_naive()))
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn leap_day_is_accepted_only_in_leap_years() {
        assert_eq!(day_code_to_date("20240229"), Some(ymd(2024, 2, 29)));
        assert_eq!(day_code_to_date("20230229"), None);
    }

    #[test]
    fn calendar_invalid_triples_are_rejected() {
        assert_eq!(day_code_to_date("20241301"), None);
        assert_eq!(day_code_to_date("20240132"), None);
        assert_eq!(day_code_to_date("20240231"), None);
        assert_eq!(day_code_to_date("20240000"), None);
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert_eq!(day_code_to_date("2024229"), None);
        assert_eq!(day_code_to_date("202402290"), None);
        assert_eq!(day_code_to_date("2024-2-9"), None);
        assert_eq!(day_code_to_date("+2024022"), None);
        assert_eq!(day_code_to_date(""), None);
        assert_eq!(day_code_to_date("２０２４０２２９"), None);
    }

    #[test]
    fn day_code_formatting() {
        assert_eq!(format_day_code(ymd(2025, 1, 1)).as_deref(), Some("20250101"));
        assert_eq!(format_day_code(ymd(987, 12, 31)).as_deref(), Some("09871231"));
        assert_eq!(format_day_code(ymd(10000, 1, 1)), None);
    }

    #[test]
    fn date_like_values_produce_day_codes() {
        assert_eq!(
            date_to_day_code(&Value::Date(ymd(2027, 7, 15))).as_deref(),
            Some("20270715")
        );
        assert_eq!(
            date_to_day_code(&Value::from("2025-01-01")).as_deref(),
            Some("20250101")
        );
        assert_eq!(
            date_to_day_code(&Value::from("2028-12-31T00:00:00.000Z")).as_deref(),
            Some("20281231")
        );
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 23, 30, 0).unwrap();
        assert_eq!(
            date_to_day_code(&Value::Timestamp(ts)).as_deref(),
            Some("20240110")
        );
    }

    #[test]
    fn non_dates_produce_no_day_code() {
        assert_eq!(date_to_day_code(&Value::Null), None);
        assert_eq!(date_to_day_code(&Value::from("tomorrow")), None);
        assert_eq!(date_to_day_code(&Value::from("2023-02-29")), None);
        assert_eq!(date_to_day_code(&Value::Integer(20250101)), None);
    }

    #[test]
    fn epoch_seconds_discard_subsecond_precision() {
        let ts = Utc
            .with_ymd_and_hms(2024, 1, 10, 12, 30, 0)
            .unwrap()
            .with_nanosecond(999_000_000)
            .unwrap();
        assert_eq!(timestamp_to_epoch_seconds(&ts), 1_704_889_800);
    }

    #[test]
    fn epoch_seconds_floor_before_epoch() {
        let ts = Utc
            .with_ymd_and_hms(1969, 12, 31, 23, 59, 59)
            .unwrap()
            .with_nanosecond(500_000_000)
            .unwrap();
        assert_eq!(timestamp_to_epoch_seconds(&ts), -1);
    }

    #[test]
    fn epoch_seconds_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 11, 15, 45, 0).unwrap();
        let seconds = timestamp_to_epoch_seconds(&ts);
        assert_eq!(epoch_seconds_to_timestamp(seconds), Some(ts));
        assert_eq!(epoch_seconds_to_timestamp(i64::MAX), None);
    }

    #[test]
    fn timestamp_values() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            timestamp_from_value(&Value::from("2024-01-01T00:00:00Z")),
            Some(expected)
        );
        assert_eq!(
            timestamp_from_value(&Value::from("2024-01-01T03:00:00+03:00")),
            Some(expected)
        );
        assert_eq!(timestamp_from_value(&Value::from("2024-01-01")), Some(expected));
        assert_eq!(
            timestamp_from_value(&Value::Date(ymd(2024, 1, 1))),
            Some(expected)
        );
        assert_eq!(timestamp_from_value(&Value::from("soon")), None);
        assert_eq!(timestamp_from_value(&Value::Null), None);
    }
}
