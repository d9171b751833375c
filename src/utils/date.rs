use chrono::{NaiveDate, NaiveDateTime};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Half-open bounds `[start 00:00:00, end + 1 day 00:00:00)` covering every
/// instant of the inclusive day range.
pub fn day_bounds(start: NaiveDate, end: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let lower = start.and_hms_opt(0, 0, 0)?;
    let upper = end.succ_opt()?.and_hms_opt(0, 0, 0)?;
    Some((lower, upper))
}
