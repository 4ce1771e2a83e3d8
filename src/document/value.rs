//! Typed cell values
//!
//! Every cell holds a [`CellValue`]. Tables additionally declare a
//! [`DataType`] per column, which governs how typed-in text is cast before
//! it is stored.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Extra layouts accepted when guessing the type of free text
const DATETIME_GUESSES: &[&str] = &[DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_GUESSES: &[&str] = &[DATE_FORMAT, "%Y/%m/%d"];
const TIME_GUESSES: &[&str] = &[TIME_FORMAT, "%H:%M"];

/// Calendar and clock values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

/// Values that are not plain text, numbers or dates
#[derive(Debug, Clone, PartialEq)]
pub enum Opaque {
    Duration(TimeDelta),
    List(Vec<CellValue>),
    Struct(Vec<(String, CellValue)>),
    /// Anything else, kept as its debug representation
    Object(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Temporal(Temporal),
    Opaque(Opaque),
}

/// Column type tags as reported to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int64,
    Float64,
    Text,
    Date,
    Time,
    Datetime,
    Duration,
    List,
    Struct,
    Object,
    #[default]
    Null,
}

impl DataType {
    pub fn name(self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Int64 => "Int64",
            DataType::Float64 => "Float64",
            DataType::Text => "Text",
            DataType::Date => "Date",
            DataType::Time => "Time",
            DataType::Datetime => "Datetime",
            DataType::Duration => "Duration",
            DataType::List => "List",
            DataType::Struct => "Struct",
            DataType::Object => "Object",
            DataType::Null => "Null",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, DataType::Date | DataType::Time | DataType::Datetime)
    }

    /// Columns whose cells cannot be edited as text.
    pub fn is_structured(self) -> bool {
        matches!(self, DataType::List | DataType::Struct | DataType::Object)
    }

    /// Cast user-typed text to this type. `None` when the text does not fit.
    ///
    /// Empty text always casts to [`CellValue::Null`].
    pub fn cast(self, text: &str) -> Option<CellValue> {
        if text.is_empty() {
            return Some(CellValue::Null);
        }
        let trimmed = text.trim();
        match self {
            DataType::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(CellValue::Bool(true)),
                "false" | "no" | "0" => Some(CellValue::Bool(false)),
                _ => None,
            },
            DataType::Int64 => trimmed.parse().ok().map(CellValue::Int),
            DataType::Float64 => trimmed.parse().ok().map(CellValue::Float),
            DataType::Text => Some(CellValue::Text(text.to_string())),
            DataType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .map(|d| CellValue::Temporal(Temporal::Date(d))),
            DataType::Time => NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
                .ok()
                .map(|t| CellValue::Temporal(Temporal::Time(t))),
            DataType::Datetime => NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
                .ok()
                .map(|dt| CellValue::Temporal(Temporal::DateTime(dt))),
            DataType::Null => Some(CellValue::infer(text)),
            DataType::Duration | DataType::List | DataType::Struct | DataType::Object => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_numeric(text: &str) -> Option<CellValue> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(CellValue::Int(int));
    }
    match text.parse::<f64>() {
        Ok(float) if float.is_finite() => Some(CellValue::Float(float)),
        _ => None,
    }
}

fn parse_temporal(text: &str) -> Option<Temporal> {
    for format in DATETIME_GUESSES {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Temporal::DateTime(dt));
        }
    }
    for format in DATE_GUESSES {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return Some(Temporal::Date(d));
        }
    }
    for format in TIME_GUESSES {
        if let Ok(t) = NaiveTime::parse_from_str(text, format) {
            return Some(Temporal::Time(t));
        }
    }
    None
}

impl CellValue {
    /// Guess the most specific value for free text:
    /// boolean, then number, then date/time, then text.
    pub fn infer(text: &str) -> CellValue {
        if text.is_empty() {
            return CellValue::Null;
        }
        let trimmed = text.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "true" => return CellValue::Bool(true),
            "false" => return CellValue::Bool(false),
            _ => {}
        }
        if let Some(number) = parse_numeric(trimmed) {
            return number;
        }
        if let Some(temporal) = parse_temporal(trimmed) {
            return CellValue::Temporal(temporal);
        }
        CellValue::Text(text.to_string())
    }

    pub fn data_type(&self) -> DataType {
        match self {
            CellValue::Null => DataType::Null,
            CellValue::Bool(_) => DataType::Boolean,
            CellValue::Int(_) => DataType::Int64,
            CellValue::Float(_) => DataType::Float64,
            CellValue::Text(_) => DataType::Text,
            CellValue::Temporal(Temporal::Date(_)) => DataType::Date,
            CellValue::Temporal(Temporal::Time(_)) => DataType::Time,
            CellValue::Temporal(Temporal::DateTime(_)) => DataType::Datetime,
            CellValue::Opaque(Opaque::Duration(_)) => DataType::Duration,
            CellValue::Opaque(Opaque::List(_)) => DataType::List,
            CellValue::Opaque(Opaque::Struct(_)) => DataType::Struct,
            CellValue::Opaque(Opaque::Object(_)) => DataType::Object,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null or empty text: nothing to draw.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    pub fn text(text: impl Into<String>) -> CellValue {
        CellValue::Text(text.into())
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::Text(text.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(x) => write_float(f, *x),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Temporal(Temporal::Date(d)) => write!(f, "{}", d.format(DATE_FORMAT)),
            CellValue::Temporal(Temporal::Time(t)) => write!(f, "{}", t.format(TIME_FORMAT)),
            CellValue::Temporal(Temporal::DateTime(dt)) => {
                write!(f, "{}", dt.format(DATETIME_FORMAT))
            }
            CellValue::Opaque(Opaque::Duration(delta)) => f.write_str(&format_duration(*delta)),
            CellValue::Opaque(Opaque::List(items)) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            CellValue::Opaque(Opaque::Struct(fields)) => {
                f.write_str("{")?;
                for (i, (name, item)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", name, item)?;
                }
                f.write_str("}")
            }
            CellValue::Opaque(Opaque::Object(repr)) => f.write_str(repr),
        }
    }
}

/// Human readable duration such as `1d 2h 3m 4s 5µs`.
///
/// Zero components are skipped; a zero duration prints as `0µs`. Days carry
/// the sign, the remaining components are always non-negative.
pub fn format_duration(delta: TimeDelta) -> String {
    const MICROS_PER_DAY: i128 = 86_400 * 1_000_000;
    let total =
        delta.num_seconds() as i128 * 1_000_000 + (delta.subsec_nanos() / 1_000) as i128;

    let days = total.div_euclid(MICROS_PER_DAY);
    let rest = total.rem_euclid(MICROS_PER_DAY);
    let seconds_of_day = rest / 1_000_000;
    let micros = rest % 1_000_000;

    let parts: Vec<String> = [
        (days, "d"),
        (seconds_of_day / 3600, "h"),
        (seconds_of_day % 3600 / 60, "m"),
        (seconds_of_day % 60, "s"),
        (micros, "µs"),
    ]
    .into_iter()
    .filter(|(amount, _)| *amount != 0)
    .map(|(amount, unit)| format!("{}{}", amount, unit))
    .collect();

    if parts.is_empty() {
        "0µs".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_order() {
        assert_eq!(CellValue::infer(""), CellValue::Null);
        assert_eq!(CellValue::infer("TRUE"), CellValue::Bool(true));
        assert_eq!(CellValue::infer("42"), CellValue::Int(42));
        assert_eq!(CellValue::infer("4.5"), CellValue::Float(4.5));
        assert_eq!(CellValue::infer("nan"), CellValue::text("nan"));
        assert_eq!(CellValue::infer("2024-03-01").data_type(), DataType::Date);
        assert_eq!(
            CellValue::infer("2024-03-01 10:11:12").data_type(),
            DataType::Datetime
        );
        assert_eq!(CellValue::infer("10:11:12").data_type(), DataType::Time);
        assert_eq!(CellValue::infer("hello"), CellValue::text("hello"));
    }

    #[test]
    fn test_cast_to_column_type() {
        assert_eq!(DataType::Int64.cast("7"), Some(CellValue::Int(7)));
        assert_eq!(DataType::Int64.cast("seven"), None);
        assert_eq!(DataType::Int64.cast(""), Some(CellValue::Null));
        assert_eq!(DataType::Boolean.cast("yes"), Some(CellValue::Bool(true)));
        assert_eq!(DataType::Text.cast("12"), Some(CellValue::text("12")));
        assert_eq!(DataType::Date.cast("2024/03/01"), None);
        assert_eq!(DataType::List.cast("[1]"), None);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Float(2.0).to_string(), "2.0");
        assert_eq!(CellValue::Float(2.25).to_string(), "2.25");
        assert_eq!(CellValue::Null.to_string(), "");
        let list = CellValue::Opaque(Opaque::List(vec![CellValue::Int(1), CellValue::Int(2)]));
        assert_eq!(list.to_string(), "[1, 2]");
    }

    #[test]
    fn test_format_duration() {
        let delta = TimeDelta::microseconds(((86_400 + 2 * 3600 + 3 * 60 + 4) * 1_000_000) + 5);
        assert_eq!(format_duration(delta), "1d 2h 3m 4s 5µs");
        assert_eq!(format_duration(TimeDelta::zero()), "0µs");
        assert_eq!(format_duration(TimeDelta::microseconds(90 * 1_000_000)), "1m 30s");
        assert_eq!(format_duration(TimeDelta::microseconds(-1_000_000)), "-1d 23h 59m 59s");
    }
}
