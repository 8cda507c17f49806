//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for refresh completion times and chart labels.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a source timestamp into UTC.
///
/// Accepts RFC 3339 strings (what spreadsheet endpoints emit for date
/// cells). Returns `None` for anything else.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.to_utc())
}

/// Format a timestamp as a wall-clock label (`HH:MM:SS`, UTC).
#[must_use]
pub fn clock_label(ts: Timestamp) -> String {
    ts.format("%H:%M:%S").to_string()
}
