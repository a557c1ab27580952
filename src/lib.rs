//! # acvp
//!
//! A client-side conformance engine for ACVP-style cryptographic validation.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! acvp = "0.3"
//! ```
//!
//! ## Features
//!
//! - `iut` (default): the shipped SHA-2, SHA-3, SP 800-90A DRBG and ML-DSA
//!   handlers and a prebuilt registry holding them
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`acvp-api`]: Error kinds, algorithm identifiers, the test-case model
//!   and the capability-handler trait
//! - [`acvp-common`]: Hex codec and typed JSON accessors
//! - [`acvp-params`]: Object sizes and buffer capacities per family
//! - [`acvp-engine`]: Schema, processor, response builder, registry and
//!   session controller
//! - [`acvp-iut`]: The shipped implementation under test

// Core re-exports (always available)
pub use acvp_api as api;
pub use acvp_common as common;
pub use acvp_engine as engine;
pub use acvp_params as params;

// Feature-gated re-exports
#[cfg(feature = "iut")]
pub use acvp_iut as iut;

/// Common imports for acvp users
pub mod prelude {
    // Error types
    pub use crate::api::{Error, ErrorKind, Location, Result};

    // Test-case model and the handler seam
    pub use crate::api::{
        AlgorithmId, CapabilityHandler, CryptoFailure, HandlerResult, OutputValue, TestCase, TestType,
    };

    // Engine entry points
    pub use crate::engine::{
        CancelFlag, CapabilityMetadata, CapabilityRegistry, EngineConfig, FailurePolicy, ResponseDocument,
        Session, SessionController, SessionState, VectorSetProcessor,
    };

    #[cfg(feature = "iut")]
    pub use crate::iut::registry;
}
