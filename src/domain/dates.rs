//! Timestamp formatting and recovery of recorded publication dates

use crate::domain::note::{parse_frontmatter, scalar_to_string, Frontmatter};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde_yaml::{Mapping, Value};
use std::fmt::Display;

/// Rendering used for `date` and `doc` fields
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%z";

/// Same rendering for values that carry no offset
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp<Tz>(timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Normalize a `created` frontmatter value.
///
/// Plain dates become midnight of that day, recognised timestamps are
/// re-rendered, and anything else passes through unchanged rather than being
/// rejected.
pub fn normalize_created(value: &Value) -> Option<String> {
    let raw = scalar_to_string(value)?;
    let trimmed = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Some(midnight.format(NAIVE_TIMESTAMP_FORMAT).to_string());
        }
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(format_timestamp(&timestamp));
    }
    if let Ok(timestamp) = DateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        return Some(format_timestamp(&timestamp));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, NAIVE_TIMESTAMP_FORMAT) {
        return Some(naive.format(NAIVE_TIMESTAMP_FORMAT).to_string());
    }

    Some(raw)
}

/// `created` field of source frontmatter, normalized
pub fn created_from_frontmatter(frontmatter: &Mapping) -> Option<String> {
    frontmatter.get("created").and_then(normalize_created)
}

/// `date` field recorded in a previously published document, verbatim
pub fn recorded_publication_date(published: &str) -> Option<String> {
    match parse_frontmatter(published) {
        Frontmatter::Parsed { fields, .. } => fields
            .get("date")
            .and_then(scalar_to_string)
            .filter(|date| !date.trim().is_empty()),
        _ => None,
    }
}
