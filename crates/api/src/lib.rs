//! Public API traits and types for the acvp engine
//!
//! This crate provides the public API surface shared by the engine, the
//! shipped implementation under test and any third-party handler crate:
//! the error kinds, the closed algorithm and test-type enumerations, the
//! capacity-checked buffer type, the per-algorithm test-case model and the
//! capability-handler trait.

pub mod case;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at the crate level for convenience
pub use error::{BufferError, CryptoFailure, Error, ErrorKind, Location, Result};
pub use types::*;

pub use case::{
    CasePayload, DrbgCase, DrbgOtherInput, DrbgUse, FieldSet, FieldValue, HashCase, MlDsaCase,
    OutputValue, TestCase,
};

// Re-export all traits from the traits module
pub use traits::{CapabilityHandler, HandlerResult};
