//! SP 800-90A Rev. 1 deterministic random bit generators
//!
//! One handler per mechanism. A case instantiates from its inputs and then
//! walks `otherInput` in order. With prediction resistance every generate
//! is preceded by a reseed with the record's entropy and additional input,
//! and itself takes none. The last generate's output is the case result.

mod ctr_drbg;
mod hash_drbg;
mod hmac_drbg;

pub use ctr_drbg::CtrDrbgHandler;
pub use hash_drbg::HashDrbgHandler;
pub use hmac_drbg::HmacDrbgHandler;

use acvp_api::{AlgorithmId, CryptoFailure, DrbgCase, DrbgUse, HandlerResult};
use acvp_engine::{CapabilityMetadata, CapabilityRegistry, RegistryError};
use acvp_params::utils::drbg::{DRBG_MAX_BYTES_PER_REQUEST, DRBG_RESEED_INTERVAL};
use tracing::debug;

/// An instantiated DRBG mechanism
trait Drbg {
    fn reseed(&mut self, entropy: &[u8], additional: &[u8]) -> Result<(), CryptoFailure>;

    /// Fill `out` and advance the state; limits are enforced by [`Drbg::generate_checked`]
    fn generate(&mut self, out: &mut [u8], additional: &[u8]) -> Result<(), CryptoFailure>;

    fn reseed_counter(&self) -> u64;

    fn generate_checked(&mut self, out: &mut [u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        if out.len() > DRBG_MAX_BYTES_PER_REQUEST {
            return Err(CryptoFailure::new(format!("{} bytes exceeds the per-request limit", out.len())));
        }
        if self.reseed_counter() > DRBG_RESEED_INTERVAL {
            return Err(CryptoFailure::new(format!(
                "reseed required after {} generate requests",
                DRBG_RESEED_INTERVAL
            )));
        }
        self.generate(out, additional)
    }
}

/// Drive an instantiated DRBG through the case's `otherInput` records
fn run_case<G: Drbg>(case: &mut DrbgCase, mut drbg: G) -> HandlerResult {
    let n = usize::try_from(case.returned_bits_len / 8)
        .map_err(|_| CryptoFailure::new("returnedBitsLen overflows usize"))?;

    let out = case.returned_bits.prepare(n)?;
    let mut generated = false;
    for step in &case.other_input {
        match step.intended_use {
            DrbgUse::ReSeed => {
                drbg.reseed(step.entropy_input.as_slice(), step.additional_input.as_slice())?;
            }
            DrbgUse::Generate if case.pred_resistance => {
                drbg.reseed(step.entropy_input.as_slice(), step.additional_input.as_slice())?;
                drbg.generate_checked(out, &[])?;
                generated = true;
            }
            DrbgUse::Generate => {
                drbg.generate_checked(out, step.additional_input.as_slice())?;
                generated = true;
            }
        }
    }
    debug!(mode = %case.mode, reseed_counter = drbg.reseed_counter(), "DRBG case finished");

    if !generated {
        case.returned_bits.clear();
        return Err(CryptoFailure::new("otherInput contains no generate step"));
    }
    Ok(())
}

/// Register Hash_DRBG, HMAC_DRBG and CTR_DRBG
pub fn register(registry: &mut CapabilityRegistry) -> Result<(), RegistryError> {
    registry.register(
        AlgorithmId::HashDrbg,
        HashDrbgHandler,
        CapabilityMetadata::new("Hash_DRBG over SHA-2 (SP 800-90A)", "1.0"),
    )?;
    registry.register(
        AlgorithmId::HmacDrbg,
        HmacDrbgHandler,
        CapabilityMetadata::new("HMAC_DRBG over SHA-2 (SP 800-90A)", "1.0"),
    )?;
    registry.register(
        AlgorithmId::CtrDrbg,
        CtrDrbgHandler,
        CapabilityMetadata::new("CTR_DRBG over AES (SP 800-90A)", "1.0"),
    )
}
