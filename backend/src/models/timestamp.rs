//! Ride start/end timestamps.

use chrono::NaiveDateTime;

use super::error::{ParseError, ParseResult};

/// Wire format of `start_time` on the ride validation endpoints.
pub const SERVICE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse a combined date and time string.
pub fn parse_datetime(raw: &str) -> ParseResult<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| ParseError::InvalidTimestamp {
            value: trimmed.to_string(),
        })
}

/// Parse a date control and a time control as one timestamp.
///
/// An empty time portion is an error even when the date is filled in.
pub fn parse_timestamp(date: &str, time: &str) -> ParseResult<NaiveDateTime> {
    if time.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    parse_datetime(&format!("{} {}", date.trim(), time.trim()))
}

/// Render a timestamp the way the last-odometer lookup expects it.
pub fn format_service_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(SERVICE_TIMESTAMP_FORMAT).to_string()
}

/// Signed number of seconds from `start` to `end`.
pub fn seconds_between(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    (*end - *start).num_milliseconds() as f64 / 1000.0
}
