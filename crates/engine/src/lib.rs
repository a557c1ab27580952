//! Vector-set test-processing engine
//!
//! The engine walks server-issued vector sets, validates every group and
//! test case against a static [`schema`], dispatches each case to the
//! handler registered for its algorithm in a [`CapabilityRegistry`] and
//! builds the mirrored [`ResponseDocument`]. The [`SessionController`]
//! drives the processor over all vector sets of a session.
//!
//! ```no_run
//! use acvp_engine::{loader, CapabilityRegistry, VectorSetProcessor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = CapabilityRegistry::new();
//! let request = loader::load_path("prompt.json")?;
//! let response = VectorSetProcessor::new(&registry).process(&request)?;
//! println!("{}", response.to_json_string(true)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ingest;
pub mod loader;
pub mod processor;
pub mod registry;
pub mod response;
pub mod schema;
pub mod session;

pub use config::{ConfigError, EngineConfig, FailurePolicy};
pub use loader::LoadError;
pub use processor::VectorSetProcessor;
pub use registry::{CapabilityEntry, CapabilityMetadata, CapabilityRegistry, RegistryError};
pub use response::{GroupResponse, ResponseBuilder, ResponseDocument, TestResponse};
pub use schema::SchemaRow;
pub use session::{
    CancelFlag, PendingVectorSet, Session, SessionController, SessionError, SessionIdentity,
    SessionReport, SessionState, VectorSetOutcome, VectorSetStatus,
};
