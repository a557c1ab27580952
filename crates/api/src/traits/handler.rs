//! Capability handler trait
//!
//! A handler is the single entry point through which the engine exercises
//! one algorithm/mode of the implementation under test.

use crate::case::TestCase;
use crate::error::CryptoFailure;

/// Outcome of one handler invocation
pub type HandlerResult = core::result::Result<(), CryptoFailure>;

/// Executes one test case
///
/// The handler reads the inputs of `case` and writes its outputs back into
/// the case's reserved buffers (or verdict flag). It must not write past a
/// buffer's capacity; [`crate::CapacityBuffer::write`] enforces this.
///
/// Handlers are invoked sequentially for the cases of a vector set, in
/// document order, so per-group state (GDT key material) may be kept
/// behind interior mutability keyed on `tg_id` and refreshed when
/// `first_in_group` is set. Different vector sets may be processed on
/// different threads, hence the `Send + Sync` bound.
pub trait CapabilityHandler: Send + Sync {
    fn handle(&self, case: &mut TestCase) -> HandlerResult;
}

impl<F> CapabilityHandler for F
where
    F: Fn(&mut TestCase) -> HandlerResult + Send + Sync,
{
    fn handle(&self, case: &mut TestCase) -> HandlerResult {
        self(case)
    }
}
