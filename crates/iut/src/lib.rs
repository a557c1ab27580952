//! Shipped implementation under test
//!
//! Capability handlers for every algorithm the engine has a schema row for,
//! and a process-wide registry holding all of them. Digests and DRBGs are
//! built on the RustCrypto `sha2`, `sha3`, `hmac` and `aes` crates; ML-DSA
//! on `fips204`.

pub mod drbg;
pub mod hash;
pub mod ml_dsa;

use acvp_engine::{CapabilityRegistry, RegistryError};
use once_cell::sync::Lazy;

pub use drbg::{CtrDrbgHandler, HashDrbgHandler, HmacDrbgHandler};
pub use hash::DigestHandler;
pub use ml_dsa::MlDsaHandler;

static REGISTRY: Lazy<Result<CapabilityRegistry, RegistryError>> = Lazy::new(default_registry);

/// Register every handler of this crate into `registry`
pub fn register_all(registry: &mut CapabilityRegistry) -> Result<(), RegistryError> {
    hash::register(registry)?;
    drbg::register(registry)?;
    ml_dsa::register(registry)?;
    Ok(())
}

/// A fresh registry holding every handler of this crate
pub fn default_registry() -> Result<CapabilityRegistry, RegistryError> {
    let mut registry = CapabilityRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

/// The process-wide registry, built on first use
pub fn registry() -> Result<&'static CapabilityRegistry, RegistryError> {
    REGISTRY.as_ref().map_err(Clone::clone)
}
