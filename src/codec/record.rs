//! Record helpers
//!
//! A record is a JSON object carrying an `id` field. Ids are compared
//! loosely: a numeric id stored in the table matches the same number
//! supplied as a string (`7 == "7"`), since ids usually arrive from
//! request parameters as text.

use std::fmt;

use serde_json::{Map, Number, Value};

/// Name of the identifying field of every record
pub const ID_FIELD: &str = "id";

/// A single record (JSON object, key order preserved)
pub type Record = Map<String, Value>;

/// Identifier used to look up records
///
/// Wraps any JSON scalar. Build one from an integer or a string, or parse
/// user input with [`RecordId::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordId(Value);

impl RecordId {
    /// Wrap an arbitrary JSON value as an id
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Parse textual input: valid JSON scalars keep their type (`7` is a
    /// number, `"7"` a string), anything else is taken as a plain string
    pub fn parse(input: &str) -> Self {
        match serde_json::from_str::<Value>(input) {
            Ok(value @ (Value::Number(_) | Value::String(_) | Value::Bool(_))) => Self(value),
            _ => Self(Value::String(input.to_string())),
        }
    }

    /// The underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Whether `record` carries an id loosely equal to this one
    ///
    /// Non-object elements and records without an `id` never match.
    pub fn matches(&self, record: &Value) -> bool {
        record_id(record).map_or(false, |id| loose_eq(id, &self.0))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(Value::from(id))
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(Value::from(id))
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        Self(Value::from(id))
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(Value::from(id))
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(Value::from(id))
    }
}

impl From<Value> for RecordId {
    fn from(id: Value) -> Self {
        Self(id)
    }
}

/// The `id` field of a stored element, if it is an object that has one
pub fn record_id(record: &Value) -> Option<&Value> {
    record.as_object()?.get(ID_FIELD)
}

/// Loose id equality
///
/// - same-typed scalars compare by value (numbers numerically, so `1 == 1.0`)
/// - a number equals a string holding the same finite number (`7 == " 7 "`)
/// - arrays and objects never compare equal
///
/// Unlike JavaScript `==`, which coerces `""` and whitespace-only strings
/// to `0`, a blank string never equals a number here: `"" != 0`. A
/// record with `"id": ""` is therefore not addressable as id `0`.
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match (numeric_text(s), n.as_f64()) {
                (Some(parsed), Some(number)) => parsed == number,
                _ => false,
            }
        }
        _ => false,
    }
}

/// Shallow merge: every patch field overwrites or extends `target`
///
/// Existing keys keep their position, new keys are appended.
pub fn merge_patch(target: &mut Record, patch: Record) {
    for (key, value) in patch {
        target.insert(key, value);
    }
}

fn number_eq(x: &Number, y: &Number) -> bool {
    if let (Some(a), Some(b)) = (x.as_i64(), y.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (x.as_u64(), y.as_u64()) {
        return a == b;
    }
    x.as_f64() == y.as_f64()
}

/// Parse an id string as a finite number ("" and "NaN" never match)
fn numeric_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}
