//! Calendar day arithmetic
//!
//! All counts are inclusive of both endpoints and never negative, so a stage
//! that starts and ends on the same day spans one day.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::{ScheduleError, ScheduleStage};

/// Inclusive day count from `start` to `end`, clamped to 0 when `end < start`
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        0
    } else {
        (end - start).num_days() + 1
    }
}

/// Days of a stage that count toward its share of the project.
///
/// A completed stage counts its full span; anything else counts from its
/// start up to `reference` (today, or a snapshot date). A completed stage
/// without an end date is treated as ongoing up to `reference`. Undated
/// stages count nothing.
pub fn days_elapsed_in_stage(stage: &ScheduleStage, reference: NaiveDate) -> i64 {
    let Some(start) = stage.start else {
        return 0;
    };
    match stage.end {
        Some(end) if stage.is_complete() => days_between(start, end),
        _ => days_between(start, reference),
    }
}

/// Parse a calendar date from a backend value.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps; the time part is discarded.
pub fn parse_date(value: &str) -> Result<NaiveDate, ScheduleError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(stamp.date_naive());
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(stamp.date());
    }
    Err(ScheduleError::InvalidDate(value.to_string()))
}

/// Serde adapter: missing, empty or unparseable dates become `None`
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        if value.trim().is_empty() {
            return None;
        }
        match parse_date(&value) {
            Ok(date) => Some(date),
            Err(err) => {
                tracing::warn!(%err, "ignoring stage date");
                None
            }
        }
    }))
}
