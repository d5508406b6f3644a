//! Deadline parsing for date-input fields.
//!
//! # Invariants
//! - The produced date is the calendar date written in the source value.
//! - Timestamps are never converted through UTC before taking the date, so a
//!   midnight-UTC deadline cannot slide to the previous local day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Format used by HTML-style date inputs and by the update payload.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineParseError {
    pub raw: String,
}

impl Display for DeadlineParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unrecognized deadline value `{}`", self.raw)
    }
}

impl Error for DeadlineParseError {}

/// Extracts the calendar date from a date or timestamp string.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the date in their own offset)
/// and offset-less timestamps.
pub fn calendar_date(raw: &str) -> Result<NaiveDate, DeadlineParseError> {
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp.date());
        }
    }

    Err(DeadlineParseError {
        raw: trimmed.to_string(),
    })
}

/// Renders a date the way a date input expects it.
pub fn format_date_input(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMAT).to_string()
}

/// Parses a value typed into a date input. Empty input means "no deadline".
pub fn parse_date_input(value: &str) -> Result<Option<NaiveDate>, DeadlineParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT)
        .map(Some)
        .map_err(|_| DeadlineParseError {
            raw: trimmed.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{calendar_date, parse_date_input};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn midnight_utc_keeps_its_calendar_day() {
        assert_eq!(
            calendar_date("2025-03-10T00:00:00.000Z").unwrap(),
            date(2025, 3, 10)
        );
    }

    #[test]
    fn late_evening_with_negative_offset_keeps_written_day() {
        assert_eq!(
            calendar_date("2025-03-10T23:30:00-05:00").unwrap(),
            date(2025, 3, 10)
        );
    }

    #[test]
    fn naive_timestamps_keep_date_part() {
        assert_eq!(
            calendar_date("2025-12-31 18:45:00").unwrap(),
            date(2025, 12, 31)
        );
        assert_eq!(
            calendar_date("2025-12-31T18:45:00.250").unwrap(),
            date(2025, 12, 31)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(calendar_date("next tuesday").is_err());
    }

    #[test]
    fn date_input_accepts_empty_as_unset() {
        assert_eq!(parse_date_input("  ").unwrap(), None);
        assert!(parse_date_input("2025-02-30").is_err());
    }
}
