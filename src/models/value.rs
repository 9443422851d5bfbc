//! Typed cell values
//!
//! Raw cells coming out of the parsers are JSON values. Once a column type has
//! been inferred every cell is cast exactly once into a [`Value`]; the
//! profiling code never looks at raw data again.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::schema::ColumnType;

/// A single typed cell
///
/// A cell that does not conform to its column type is kept as [`Value::Text`]
/// so that it can still be counted, but it never contributes to numeric
/// aggregates.
///
/// Serialized cells carry no type tag. Deserializing reads every string as
/// [`Value::Text`]; use [`Value::cast`] with the column type to recover dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UntypedCell {
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match UntypedCell::deserialize(deserializer)? {
            UntypedCell::Null => Value::Null,
            UntypedCell::Boolean(b) => Value::Boolean(b),
            UntypedCell::Number(n) => Value::Number(n),
            UntypedCell::Text(s) => Value::Text(s),
        })
    }
}

impl Value {
    /// Cast a raw parsed cell into a typed value for a column of type `ty`
    pub fn cast(raw: &serde_json::Value, ty: ColumnType) -> Value {
        match raw {
            serde_json::Value::Null => return Value::Null,
            serde_json::Value::String(s) if s.trim().is_empty() => return Value::Null,
            _ => {}
        }

        let cast = match ty {
            ColumnType::Boolean => raw_as_bool(raw).map(Value::Boolean),
            ColumnType::Number => raw_as_number(raw).map(Value::Number),
            ColumnType::Date => raw.as_str().and_then(parse_date).map(Value::Date),
            ColumnType::String => None,
        };

        cast.unwrap_or_else(|| Value::Text(raw_to_text(raw)))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell; only [`Value::Number`] qualifies
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Canonical key used for frequency and distinctness counting
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Value::Null => Cow::Borrowed(""),
            Value::Boolean(true) => Cow::Borrowed("true"),
            Value::Boolean(false) => Cow::Borrowed("false"),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Date(d) => Cow::Owned(format_date(d)),
            Value::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Convert into a JSON value for attaching to insights
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Date(d) => serde_json::Value::String(format_date(d)),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            other => write!(f, "{}", other.key()),
        }
    }
}

fn format_date(d: &NaiveDateTime) -> String {
    if d.time() == NaiveTime::MIN {
        d.format("%Y-%m-%d").to_string()
    } else {
        d.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Render a raw cell as text (nested structures become compact JSON)
pub(crate) fn raw_to_text(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn raw_as_bool(raw: &serde_json::Value) -> Option<bool> {
    match raw {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => parse_bool(s),
        _ => None,
    }
}

pub(crate) fn raw_as_number(raw: &serde_json::Value) -> Option<f64> {
    match raw {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        serde_json::Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Parse `true`/`false` (case-insensitive)
pub fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a finite number
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y"];

/// Parse a date or date-time
///
/// Only strings containing a `-` or `/` separator qualify, so plain numbers
/// such as `20240115` are never read as dates.
pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if !s.contains('-') && !s.contains('/') {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}
