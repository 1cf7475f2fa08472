//! Record types for storing name/value pairs.

use crate::validate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the store when a record is added.
///
/// Ids start at 1 and are never reused within a store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The id following this one.
    pub fn next(self) -> Self {
        RecordId(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// The value half of a pair.
///
/// Values that read as a finite number are kept as numbers so that sorting
/// by value orders `9` before `10`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(serde_json::Number),
    Text(String),
}

impl Value {
    /// Build a value from validated input text, coercing numeric text.
    pub fn from_input(raw: &str) -> Self {
        match validate::parse_number(raw) {
            Some(n) => Value::Number(number_from_f64(n)),
            None => Value::Text(raw.to_string()),
        }
    }

    /// Check if this value holds a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number_from_f64(n: f64) -> serde_json::Number {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serde_json::Number::from(n as i64)
    } else {
        // parse_number only yields finite values
        serde_json::Number::from_f64(n).unwrap_or_else(|| serde_json::Number::from(0))
    }
}

/// A name/value record in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier for this record
    pub id: RecordId,
    /// Alphanumeric, non-numeric name
    pub name: String,
    /// Alphanumeric value, numeric when it reads as a number
    pub value: Value,
}

impl Record {
    /// Create a new record.
    pub fn new(id: RecordId, name: impl Into<String>, value: Value) -> Self {
        Self {
            id,
            name: name.into(),
            value,
        }
    }

    /// The `name=value` text shown for this record in a list.
    pub fn label(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// One row of a selectable list view of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    /// Id handed back when the row is selected
    pub id: RecordId,
    /// Display text
    pub label: String,
}

impl From<&Record> for ListItem {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id,
            label: record.label(),
        }
    }
}
