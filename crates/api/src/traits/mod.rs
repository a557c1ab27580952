//! Traits implemented by the cryptographic module under test

pub mod handler;

pub use handler::{CapabilityHandler, HandlerResult};
