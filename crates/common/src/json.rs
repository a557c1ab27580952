//! Typed field access over `serde_json` objects
//!
//! Each accessor returns `Ok(None)` when the field is absent or `null`,
//! and an error when it is present with the wrong JSON kind.

use serde_json::{Map, Value};
use thiserror::Error;

/// A field was present with the wrong JSON kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("field '{field}' should be {expected}, found {found}")]
pub struct JsonKindError {
    pub field: &'static str,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Name of a value's JSON kind, for diagnostics
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn lookup<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn wrong(field: &'static str, expected: &'static str, value: &Value) -> JsonKindError {
    JsonKindError { field, expected, found: kind_name(value) }
}

pub fn get_str<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a str>, JsonKindError> {
    match lookup(obj, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(wrong(field, "string", other)),
    }
}

/// Non-negative integer field
pub fn get_u64(obj: &Map<String, Value>, field: &'static str) -> Result<Option<u64>, JsonKindError> {
    match lookup(obj, field) {
        None => Ok(None),
        Some(v @ Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| wrong(field, "non-negative integer", v)),
        Some(other) => Err(wrong(field, "non-negative integer", other)),
    }
}

pub fn get_bool(obj: &Map<String, Value>, field: &'static str) -> Result<Option<bool>, JsonKindError> {
    match lookup(obj, field) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong(field, "boolean", other)),
    }
}

pub fn get_array<'a>(
    obj: &'a Map<String, Value>,
    field: &'static str,
) -> Result<Option<&'a Vec<Value>>, JsonKindError> {
    match lookup(obj, field) {
        None => Ok(None),
        Some(Value::Array(a)) => Ok(Some(a)),
        Some(other) => Err(wrong(field, "array", other)),
    }
}

/// View a value as an object, naming the element in the error
pub fn as_object<'a>(
    value: &'a Value,
    what: &'static str,
) -> Result<&'a Map<String, Value>, JsonKindError> {
    value.as_object().ok_or_else(|| wrong(what, "object", value))
}
