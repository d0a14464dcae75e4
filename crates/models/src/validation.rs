use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const BLANK: &str = "This field may not be blank.";
pub const INVALID_STRING: &str = "Not a valid string.";
pub const INVALID_NUMBER: &str = "A valid number is required.";
pub const INVALID_INTEGER: &str = "A valid integer is required.";
pub const INVALID_DATETIME: &str = "Datetime has wrong format. Use one of these formats instead: \
     YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z], YYYY-MM-DD.";

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded against a single field
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for ValidationErrors {}

/// Raw request body, a JSON object whose keys have not been checked yet.
/// Keys that no entity reads are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Removes `field` from the payload and runs `parse` on it.
    ///
    /// An absent field is only an error when `required` is set. Any failure is
    /// recorded in `errors` and yields `None`.
    pub(crate) fn take<T>(
        &mut self,
        field: &str,
        required: bool,
        errors: &mut ValidationErrors,
        parse: impl FnOnce(Value) -> Result<T, String>,
    ) -> Option<T> {
        match self.0.remove(field) {
            None => {
                if required {
                    errors.add(field, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                errors.add(field, NOT_NULL);
                None
            }
            Some(value) => match parse(value) {
                Ok(parsed) => Some(parsed),
                Err(message) => {
                    errors.add(field, message);
                    None
                }
            },
        }
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Parses a non-blank string of at most `max_length` characters.
/// Surrounding whitespace is trimmed and numbers are accepted as text.
pub(crate) fn text(value: Value, max_length: usize) -> Result<String, String> {
    let raw = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return Err(INVALID_STRING.to_string()),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BLANK.to_string());
    }
    if trimmed.chars().count() > max_length {
        return Err(format!(
            "Ensure this field has no more than {max_length} characters."
        ));
    }

    Ok(trimmed.to_string())
}

/// Parses an `i32` no smaller than `min`
pub(crate) fn integer(value: Value, min: i32) -> Result<i32, String> {
    let parsed = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 1e18 => f as i64,
                _ => return Err(INVALID_INTEGER.to_string()),
            },
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| INVALID_INTEGER.to_string())?,
        _ => return Err(INVALID_INTEGER.to_string()),
    };

    if parsed < i64::from(min) {
        return Err(format!(
            "Ensure this value is greater than or equal to {min}."
        ));
    }

    i32::try_from(parsed)
        .map_err(|_| format!("Ensure this value is less than or equal to {}.", i32::MAX))
}

/// Parses a decimal from a JSON number or a numeric string
pub(crate) fn decimal(value: Value) -> Result<Decimal, String> {
    let raw = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(INVALID_NUMBER.to_string()),
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| INVALID_NUMBER.to_string())
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a date-time or a plain date (taken as midnight).
/// Offsets are converted to UTC and sub-second precision is dropped.
pub(crate) fn date_time(value: Value) -> Result<NaiveDateTime, String> {
    let Value::String(raw) = value else {
        return Err(INVALID_DATETIME.to_string());
    };
    let raw = raw.trim();

    let parsed = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| INVALID_DATETIME.to_string())?;

    Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
}
