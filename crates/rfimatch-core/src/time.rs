//! UTC timestamp helpers shared by filters, archive records and tracks

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Naive ISO-8601 layout accepted for filter timestamps (e.g. `2025-06-01T08:49:54.0`)
pub const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse an ISO-8601 timestamp as UTC
///
/// Accepts RFC 3339 (`Z` or explicit offset), naive date-times (interpreted as
/// UTC, with `T` or a space separator) and bare dates (midnight UTC).
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    for format in [NAIVE_TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d").ok().map(utc_midnight)
}

/// Parse a strict naive timestamp (`YYYY-MM-DDTHH:MM:SS[.fff]`, optional `Z`)
pub fn parse_naive_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let naive = value.strip_suffix('Z').unwrap_or(value);
    NaiveDateTime::parse_from_str(naive, NAIVE_TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// Calendar date written in an ISO-8601 value
///
/// An explicit offset is ignored rather than applied, so the wall-clock date
/// is kept (`2025-01-31T01:00:00+02:00` is 2025-01-31).
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Some(dt.date_naive()),
        Err(_) => parse_utc(value).map(|dt| dt.date_naive()),
    }
}

/// Midnight UTC of a calendar date
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Render as ISO-8601 with millisecond precision and a `Z` suffix
pub fn format_iso_millis(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
