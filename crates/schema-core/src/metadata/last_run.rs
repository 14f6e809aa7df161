//! Last-run timestamp handling.
//!
//! The document's metadata section may carry the epoch-millisecond time at
//! which the schema dump was produced. A value that is not an integer degrades
//! to "absent" instead of failing the load.

use crate::config::DisplayConfig;
use chrono::{DateTime, Local, TimeZone};

/// Parse the textual timestamp from the metadata section.
///
/// Returns `None` for empty or non-integer text.
pub fn parse_last_run(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>().ok()
}

/// Format a last-run timestamp in the given time zone.
///
/// Non-positive values are treated as absent.
pub fn format_last_run<Tz>(millis: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if millis <= 0 {
        return None;
    }
    let utc = DateTime::from_timestamp_millis(millis)?;
    Some(
        utc.with_timezone(tz)
            .format(DisplayConfig::LAST_RUN_FORMAT)
            .to_string(),
    )
}

/// Format a last-run timestamp in the local time zone.
pub fn format_last_run_local(millis: i64) -> Option<String> {
    format_last_run(millis, &Local)
}
