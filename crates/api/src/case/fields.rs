//! Decoded request fields, before they are bound to a typed test case

use crate::error::{Error, Location, Result};
use crate::types::CapacityBuffer;

/// A single decoded JSON field
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// Hex string, already decoded into a capacity-checked buffer
    Hex(CapacityBuffer),
    /// Free-form or closed-choice string
    Str(String),
    /// Non-negative integer
    Int(u64),
    /// Boolean
    Bool(bool),
    /// Array of nested records
    Records(Vec<FieldSet>),
}

impl FieldValue {
    /// Name of the JSON kind, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Hex(_) => "hex string",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "boolean",
            Self::Records(_) => "array",
        }
    }
}

/// Ordered set of decoded fields for one group or one test case
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    entries: Vec<(&'static str, FieldValue)>,
}

impl FieldSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same name
    pub fn insert(&mut self, name: &'static str, value: FieldValue) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Copy every field of `other` that is not already present
    pub fn inherit(&mut self, other: &FieldSet) {
        for (name, value) in &other.entries {
            if !self.contains(name) {
                self.entries.push((name, value.clone()));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove and return a field
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.entries.iter().position(|(n, _)| *n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (*n, v))
    }

    /// Boolean field, if present
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Integer field, if present
    pub fn int(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(FieldValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// String field, if present
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FieldValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Take a required hex field
    pub fn require_hex(&mut self, name: &'static str, at: Location) -> Result<CapacityBuffer> {
        match self.take(name) {
            Some(FieldValue::Hex(buf)) => Ok(buf),
            Some(other) => Err(mismatch(name, "hex string", &other, at)),
            None => Err(Error::missing(at, name)),
        }
    }

    /// Take an optional hex field, falling back to an empty buffer of `capacity`
    pub fn optional_hex(
        &mut self,
        name: &'static str,
        capacity: usize,
        at: Location,
    ) -> Result<CapacityBuffer> {
        match self.take(name) {
            Some(FieldValue::Hex(buf)) => Ok(buf),
            Some(other) => Err(mismatch(name, "hex string", &other, at)),
            None => CapacityBuffer::try_with_capacity(capacity)
                .map_err(|e| e.into_error(at.with_field(name))),
        }
    }

    pub fn require_str(&mut self, name: &'static str, at: Location) -> Result<String> {
        match self.take(name) {
            Some(FieldValue::Str(s)) => Ok(s),
            Some(other) => Err(mismatch(name, "string", &other, at)),
            None => Err(Error::missing(at, name)),
        }
    }

    pub fn require_int(&mut self, name: &'static str, at: Location) -> Result<u64> {
        match self.take(name) {
            Some(FieldValue::Int(i)) => Ok(i),
            Some(other) => Err(mismatch(name, "integer", &other, at)),
            None => Err(Error::missing(at, name)),
        }
    }

    pub fn require_bool(&mut self, name: &'static str, at: Location) -> Result<bool> {
        match self.take(name) {
            Some(FieldValue::Bool(b)) => Ok(b),
            Some(other) => Err(mismatch(name, "boolean", &other, at)),
            None => Err(Error::missing(at, name)),
        }
    }

    /// Take an optional boolean field, `false` when absent
    pub fn optional_bool(&mut self, name: &'static str, at: Location) -> Result<bool> {
        match self.take(name) {
            Some(FieldValue::Bool(b)) => Ok(b),
            Some(other) => Err(mismatch(name, "boolean", &other, at)),
            None => Ok(false),
        }
    }

    pub fn require_records(&mut self, name: &'static str, at: Location) -> Result<Vec<FieldSet>> {
        match self.take(name) {
            Some(FieldValue::Records(r)) => Ok(r),
            Some(other) => Err(mismatch(name, "array", &other, at)),
            None => Err(Error::missing(at, name)),
        }
    }
}

fn mismatch(name: &'static str, expected: &str, got: &FieldValue, at: Location) -> Error {
    Error::malformed(
        at.with_field(name),
        format!("expected {}, found {}", expected, got.kind_name()),
    )
}
