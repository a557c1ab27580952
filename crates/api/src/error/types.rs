//! Error type definitions for vector-set processing

use core::fmt;
use serde::Serialize;
use thiserror::Error;

/// Where in a vector set an error was detected
///
/// Every field is optional: a failure while resolving the algorithm has no
/// group, a group-level failure has no test case, and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    /// Server-assigned test group id
    pub tg_id: Option<u64>,
    /// Server-assigned test case id
    pub tc_id: Option<u64>,
    /// JSON field being ingested or emitted
    pub field: Option<&'static str>,
}

impl Location {
    /// Location covering a whole vector set
    pub const fn vector_set() -> Self {
        Self { tg_id: None, tc_id: None, field: None }
    }

    /// Location of a test group
    pub const fn group(tg_id: u64) -> Self {
        Self { tg_id: Some(tg_id), tc_id: None, field: None }
    }

    /// Location of a test case inside a group
    pub const fn case(tg_id: u64, tc_id: u64) -> Self {
        Self { tg_id: Some(tg_id), tc_id: Some(tc_id), field: None }
    }

    /// Same location, narrowed to a field
    pub const fn with_field(self, field: &'static str) -> Self {
        Self { field: Some(field), ..self }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(tg_id) = self.tg_id {
            parts.push(format!("tgId={}", tg_id));
        }
        if let Some(tc_id) = self.tc_id {
            parts.push(format!("tcId={}", tc_id));
        }
        if let Some(field) = self.field {
            parts.push(format!("field={}", field));
        }
        if parts.is_empty() {
            Ok(())
        } else {
            write!(f, " [{}]", parts.join(", "))
        }
    }
}

/// Primary error type for vector-set processing
///
/// Every variant aborts the vector set it was raised in; no partial
/// response is ever produced alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Structurally broken JSON, wrong JSON kind, bad hex or oversized field
    #[error("malformed request{location}: {message}")]
    MalformedRequest { location: Location, message: String },

    /// A field required for this algorithm/mode/testType is absent
    #[error("missing required field '{field}'{location}")]
    MissingField { location: Location, field: &'static str },

    /// Unrecognized algorithm, mode, testType or closed-choice value
    #[error("invalid request{location}: {message}")]
    InvalidRequest { location: Location, message: String },

    /// The algorithm is valid but not registered in this build
    #[error("unsupported operation: {algorithm} is not registered")]
    UnsupportedOperation { algorithm: String },

    /// The capability handler reported failure
    #[error("crypto module failure{location}: {message}")]
    CryptoModuleFailure { location: Location, message: String },

    /// Buffer acquisition failed
    #[error("allocation failure{location}: {message}")]
    AllocationFailure { location: Location, message: String },
}

/// Result type for engine operations
pub type Result<T> = core::result::Result<T, Error>;

/// Discriminant of [`Error`], used for status reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    MalformedRequest,
    MissingField,
    InvalidRequest,
    UnsupportedOperation,
    CryptoModuleFailure,
    AllocationFailure,
}

impl Error {
    /// Build a malformed-request error
    pub fn malformed(location: Location, message: impl Into<String>) -> Self {
        Self::MalformedRequest { location, message: message.into() }
    }

    /// Build a missing-field error; the field is also recorded in the location
    pub fn missing(location: Location, field: &'static str) -> Self {
        Self::MissingField { location: location.with_field(field), field }
    }

    /// Build an invalid-request error
    pub fn invalid(location: Location, message: impl Into<String>) -> Self {
        Self::InvalidRequest { location, message: message.into() }
    }

    /// Build a crypto-module failure
    pub fn crypto(location: Location, message: impl Into<String>) -> Self {
        Self::CryptoModuleFailure { location, message: message.into() }
    }

    /// The error's kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest { .. } => ErrorKind::MalformedRequest,
            Self::MissingField { .. } => ErrorKind::MissingField,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::CryptoModuleFailure { .. } => ErrorKind::CryptoModuleFailure,
            Self::AllocationFailure { .. } => ErrorKind::AllocationFailure,
        }
    }

    /// The location the error carries, if any
    pub fn location(&self) -> Option<Location> {
        match self {
            Self::MalformedRequest { location, .. }
            | Self::MissingField { location, .. }
            | Self::InvalidRequest { location, .. }
            | Self::CryptoModuleFailure { location, .. }
            | Self::AllocationFailure { location, .. } => Some(*location),
            Self::UnsupportedOperation { .. } => None,
        }
    }

    /// Re-anchor an error raised deeper down at a more precise location
    ///
    /// Fields already known to the error win over the ones supplied.
    pub fn at(self, outer: Location) -> Self {
        let merge = |inner: Location| Location {
            tg_id: inner.tg_id.or(outer.tg_id),
            tc_id: inner.tc_id.or(outer.tc_id),
            field: inner.field.or(outer.field),
        };
        match self {
            Self::MalformedRequest { location, message } => {
                Self::MalformedRequest { location: merge(location), message }
            }
            Self::MissingField { location, field } => {
                Self::MissingField { location: merge(location), field }
            }
            Self::InvalidRequest { location, message } => {
                Self::InvalidRequest { location: merge(location), message }
            }
            Self::CryptoModuleFailure { location, message } => {
                Self::CryptoModuleFailure { location: merge(location), message }
            }
            Self::AllocationFailure { location, message } => {
                Self::AllocationFailure { location: merge(location), message }
            }
            other @ Self::UnsupportedOperation { .. } => other,
        }
    }
}

/// Errors raised by [`crate::CapacityBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    /// More bytes were offered than the buffer can hold
    #[error("capacity exceeded: {requested} bytes requested, capacity is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    /// The backing allocation could not be reserved
    #[error("unable to reserve {capacity} bytes")]
    Allocation { capacity: usize },
}

impl BufferError {
    /// Lift into an engine error at the given location
    pub fn into_error(self, location: Location) -> Error {
        match self {
            Self::CapacityExceeded { .. } => Error::malformed(location, self.to_string()),
            Self::Allocation { .. } => {
                Error::AllocationFailure { location, message: self.to_string() }
            }
        }
    }
}

/// Failure reported by a capability handler
///
/// Handlers return this instead of an engine [`Error`]; the processor turns
/// it into [`Error::CryptoModuleFailure`] at the failing test case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CryptoFailure {
    message: String,
}

impl CryptoFailure {
    /// Create a failure with a diagnostic message
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// The diagnostic message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<BufferError> for CryptoFailure {
    fn from(e: BufferError) -> Self {
        Self::new(e.to_string())
    }
}
