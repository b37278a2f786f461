// ── Calendar date normalization ──
//
// The only place where wire date strings and date-widget values meet.
// On the wire and in the store a date is always `YYYY-MM-DD`; in a form
// it is a `NaiveDate`. No other module converts between the two.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::CoreError;

/// Format used on the wire and in the snapshot.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp shape some server versions emit for date columns.
const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a wire date into a widget value.
///
/// Accepts `YYYY-MM-DD`, and also a full timestamp (`2024-06-01T00:00:00.000Z`),
/// keeping only its calendar date.
pub fn parse_wire_date(raw: &str) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, WIRE_DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, WIRE_TIMESTAMP_FORMAT) {
        return Ok(ts.date());
    }

    Err(CoreError::validation(
        "date",
        format!("expected YYYY-MM-DD, got {raw:?}"),
    ))
}

/// Serialize a widget value back to its wire form.
pub fn format_wire_date(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// Absent and blank dates stay absent; they never become a sentinel date.
pub fn parse_optional_wire_date(raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_wire_date(s).map(Some),
    }
}

pub fn format_optional_wire_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_wire_date)
}
