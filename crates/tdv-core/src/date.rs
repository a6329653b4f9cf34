//! Day-granularity date handling for record date fields.
//!
//! Record dates arrive as `YYYY-MM-DD` strings or as ISO 8601 date-times
//! (`2023-06-15T14:30:00Z`). Range checks only ever look at the calendar day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use tdv_model::Record;

/// Parse the calendar day out of a date or date-time string.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    // Anything else with a leading ISO date, e.g. "2023-06-15 14:30".
    text.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Calendar day stored in `field`, if present and parseable.
pub fn record_day(record: &Record, field: &str) -> Option<NaiveDate> {
    record.get(field)?.as_str().and_then(parse_day)
}

/// Inclusive range check; open bounds always pass.
pub fn within(day: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|from| day >= from) && to.is_none_or(|to| day <= to)
}
