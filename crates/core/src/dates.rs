//! Lenient parsing for stored planning dates.
//!
//! The entity model keeps all dates as strings (the legacy data set mixes
//! bare dates, full ISO timestamps, and empty values). Consumers parse on
//! demand: anything that does not yield a calendar date is treated as
//! absent, never as an error.

use chrono::NaiveDate;

/// Parse a stored date string, considering only the leading `YYYY-MM-DD`.
///
/// Returns `None` for missing, empty, or malformed values.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let s = value?.trim();
    // Timestamps carry the date in the first 10 characters.
    let head = if s.len() > 10 { s.get(..10)? } else { s };
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
