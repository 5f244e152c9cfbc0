//! Timestamp parsing for event records and identifiers.
//!
//! Timestamps are treated as UTC-equivalent wall-clock times. A trailing zone
//! suffix (`Z`, `+hh:mm`, `-hh:mm`) is stripped, not applied.

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp such as `2024-05-10T15:00Z` or `2024-05-10T15:00:00`.
///
/// Returns `None` for anything that is not a recognizable date or date-time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let text = strip_zone_suffix(raw.trim());

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn strip_zone_suffix(text: &str) -> &str {
    let text = text.strip_suffix('Z').unwrap_or(text);

    // Offsets only ever follow the time part, so search after the 'T'.
    match text.find('T') {
        Some(t_pos) => match text[t_pos..].find(['+', '-']) {
            Some(offset) => &text[..t_pos + offset],
            None => text,
        },
        None => text,
    }
}
