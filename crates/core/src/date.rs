//! Calendar-date parsing and the canonical day boundary.
//!
//! All dates on the wire are `YYYY-MM-DD` calendar dates with no time
//! component, interpreted as local-midnight boundaries. Parsing is strict:
//! a failure is a typed [`DateParseError`] so callers can report the data
//! quality problem instead of silently losing it.

use chrono::NaiveDate;

/// A wire date string that is not a valid `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid calendar date '{input}': expected YYYY-MM-DD")]
pub struct DateParseError {
    /// The offending input, preserved for diagnostics.
    pub input: String,
}

/// Parse a `YYYY-MM-DD` wire date.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| DateParseError {
        input: input.to_string(),
    })
}

/// The current local civil date.
///
/// Classification uses this day boundary consistently for both parsing and
/// comparison, so results do not drift across timezone or DST offsets.
pub fn today_local() -> NaiveDate {
    chrono::Local::now().date_naive()
}
