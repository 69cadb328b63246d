//! Value coercion helpers for Socrata records.
//!
//! Socrata serializes most fields as JSON strings, so every helper accepts
//! both the string form and the native JSON form.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Parses a Socrata floating timestamp (`2024-01-15T00:00:00.000`) or a bare
/// `YYYY-MM-DD` date, keeping only the date.
#[must_use]
pub fn parse_socrata_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Coerces a JSON value to a date.
#[must_use]
pub fn value_as_date(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(parse_socrata_date)
}

/// Coerces a JSON value to an integer. Accepts integral numbers and strings
/// holding an integer.
#[must_use]
pub fn value_as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            #[allow(clippy::cast_possible_truncation)]
            let whole = f as i64;
            (f.fract() == 0.0 && f.abs() < 9.0e15).then_some(whole)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerces a JSON value to text. `null` has no text form.
#[must_use]
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
