//! Error handling for the vector-set engine

pub mod types;

// Re-export the primary error type and result
pub use types::{BufferError, CryptoFailure, Error, ErrorKind, Location, Result};
