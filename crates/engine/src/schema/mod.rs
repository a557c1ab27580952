//! Required-field schemas per algorithm and test type
//!
//! One [`SchemaRow`] per `(AlgorithmId, TestType)` pair drives ingestion,
//! output serialization and group-derived fields. The walker in
//! [`crate::processor`] never looks at algorithm names; adding a family
//! means adding rows here, a registry entry and a handler.

mod table;

use acvp_api::{AlgorithmId, TestType};

pub use table::ROWS;

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Required unless the named boolean group field is `true`
    RequiredUnless(&'static str),
}

/// Expected JSON kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Hex string decoded into a capacity-checked buffer
    Hex,
    /// Free-form string
    Str,
    /// String restricted to the listed values
    Choice(&'static [&'static str]),
    /// Non-negative integer
    Int,
    Bool,
    /// Array of objects, each ingested against the nested specs
    Records(&'static [FieldSpec]),
}

/// One request field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, presence: Presence::Required }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind, presence: Presence::Optional }
    }

    pub const fn required_unless(name: &'static str, kind: FieldKind, flag: &'static str) -> Self {
        Self { name, kind, presence: Presence::RequiredUnless(flag) }
    }
}

/// JSON kind of a produced output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Hex,
    Bool,
}

/// One response field a handler promises to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub name: &'static str,
    pub kind: OutputKind,
}

impl OutputSpec {
    pub const fn hex(name: &'static str) -> Self {
        Self { name, kind: OutputKind::Hex }
    }

    pub const fn bool(name: &'static str) -> Self {
        Self { name, kind: OutputKind::Bool }
    }
}

/// Schema of one `(algorithm, testType)` pair
#[derive(Debug, Clone, Copy)]
pub struct SchemaRow {
    pub algorithms: &'static [AlgorithmId],
    pub test_type: TestType,
    /// Group-level parameters
    pub group: &'static [FieldSpec],
    /// Per-test inputs
    pub test: &'static [FieldSpec],
    /// Per-test outputs, in response order
    pub outputs: &'static [OutputSpec],
    /// Outputs copied from the first test case into the group object
    pub group_outputs: &'static [OutputSpec],
    /// Capacity in bytes of every hex buffer of this row
    pub capacity: usize,
}

impl SchemaRow {
    /// Largest hex string this row may emit
    pub fn max_hex_len(&self) -> usize {
        self.capacity * 2
    }
}

/// Find the row for an algorithm and test type
pub fn lookup(algorithm: AlgorithmId, test_type: TestType) -> Option<&'static SchemaRow> {
    ROWS.iter()
        .find(|row| row.test_type == test_type && row.algorithms.contains(&algorithm))
}
