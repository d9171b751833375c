//! Time utilities: storage/display timestamp formats, clock, durations.

use chrono::{Duration, NaiveDateTime, Utc};

/// Fixed-width storage format: text order equals chronological order.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format used in JSON payloads, CLI output and exports.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current server time (UTC, naive).
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn to_storage(dt: &NaiveDateTime) -> String {
    dt.format(STORAGE_FORMAT).to_string()
}

/// Parse a stored timestamp. Accepts rows written with or without the
/// fractional part and with a `T` separator.
pub fn from_storage(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

pub fn format_display(dt: &NaiveDateTime) -> String {
    dt.format(DISPLAY_FORMAT).to_string()
}

/// Whole seconds elapsed between `start` and `end`, fractions truncated.
pub fn duration_seconds(start: &NaiveDateTime, end: &NaiveDateTime) -> i64 {
    (*end - *start).num_seconds()
}

/// Shift a timestamp by a presentation offset expressed in minutes.
pub fn shift_minutes(dt: &NaiveDateTime, offset_minutes: i64) -> NaiveDateTime {
    *dt + Duration::minutes(offset_minutes)
}
