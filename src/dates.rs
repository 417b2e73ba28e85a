use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use log::{debug, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A date as supplied by a form: a full timestamp, a calendar date, or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum DateValue {
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Text(String),
}

impl From<DateTime<Utc>> for DateValue {
    fn from(value: DateTime<Utc>) -> Self {
        DateValue::Timestamp(value)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        DateValue::Date(value)
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        DateValue::Text(value.to_string())
    }
}

/// Parses the date strings forms and the backend produce: RFC 3339 with an
/// offset, an offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC), or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Resolves a date to a UTC instant, falling back to `now` when the value is
/// absent, blank, or unparseable.
pub fn resolve_date(value: Option<&DateValue>, now: DateTime<Utc>) -> DateTime<Utc> {
    match value {
        None => {
            debug!("No date supplied, using current instant");
            now
        }
        Some(DateValue::Timestamp(dt)) => *dt,
        Some(DateValue::Date(d)) => d
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .unwrap_or(now),
        Some(DateValue::Text(text)) if text.trim().is_empty() => {
            debug!("Blank date supplied, using current instant");
            now
        }
        Some(DateValue::Text(text)) => parse_date(text).unwrap_or_else(|| {
            warn!("Unparseable date '{}', using current instant", text);
            now
        }),
    }
}

/// Canonical wire form: UTC with millisecond precision, e.g.
/// `2024-03-01T00:00:00.000Z`.
pub fn normalize_date(value: Option<&DateValue>, now: DateTime<Utc>) -> String {
    resolve_date(value, now).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn normalize_date_now(value: Option<&DateValue>) -> String {
    normalize_date(value, Utc::now())
}

pub fn from_wire_date(value: Option<&Value>) -> Option<DateValue> {
    match value? {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(
            parse_date(s)
                .map(DateValue::Timestamp)
                .unwrap_or_else(|| DateValue::Text(s.clone())),
        ),
        _ => None,
    }
}
