//! Field-level validation.
//!
//! Request bodies arrive from browser forms, so numbers and identifiers may be
//! sent either as JSON numbers or as strings. The helpers here coerce raw JSON
//! values into typed fields and collect one list of messages per field.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message for a missing, null or blank field.
pub const BLANK: &str = "can't be blank";
/// Message for a field that does not hold an integer.
pub const NOT_A_NUMBER: &str = "is not a number";
/// Message for a negative amount.
pub const NEGATIVE: &str = "must be greater than or equal to 0";
/// Message for a field that does not hold a `YYYY-MM-DD` date.
pub const INVALID_DATE: &str = "is not a valid date";
/// Message for a malformed value (identifiers, non-text descriptions).
pub const INVALID: &str = "is invalid";
/// Message for a reference to a record that does not exist.
pub const MUST_EXIST: &str = "must exist";
/// Message for a value that must be unique but is already used.
pub const TAKEN: &str = "has already been taken";

/// Validation failures keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty set of errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding one message for one field.
    #[must_use]
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Names of the fields that failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Turn the collected errors into a `Result`, succeeding with `value` when empty.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{field} {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Treat JSON `null` like an absent field.
pub(crate) fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Coerce a value to an integer.
///
/// Whole floats such as `12.0` are accepted; `12.5` is not.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn integer(value: &Value) -> Result<i64, &'static str> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            })
            .ok_or(NOT_A_NUMBER),
        Value::String(s) if s.trim().is_empty() => Err(BLANK),
        Value::String(s) => s.trim().parse().map_err(|_| NOT_A_NUMBER),
        _ => Err(NOT_A_NUMBER),
    }
}

/// Coerce a value to a calendar date.
pub(crate) fn date(value: &Value) -> Result<NaiveDate, &'static str> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(BLANK),
        Value::String(s) => {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| INVALID_DATE)
        }
        _ => Err(INVALID_DATE),
    }
}

/// Coerce a value to non-blank text.
pub(crate) fn text(value: &Value) -> Result<String, &'static str> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(BLANK),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(INVALID),
    }
}

/// Coerce a value to a string that is then parsed by `parse`.
pub(crate) fn parsed<T>(value: &Value, parse: impl Fn(&str) -> Option<T>) -> Result<T, &'static str> {
    match value {
        Value::String(s) if s.trim().is_empty() => Err(BLANK),
        Value::String(s) => parse(s).ok_or(INVALID),
        _ => Err(INVALID),
    }
}
