//! HMAC_DRBG (SP 800-90A Rev. 1, section 10.1.2)

use core::marker::PhantomData;

use acvp_api::{CapabilityHandler, CryptoFailure, HandlerResult, TestCase};
use hmac::digest::core_api::BlockSizeUser;
use hmac::digest::Digest;
use hmac::{Mac, SimpleHmac};
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use zeroize::Zeroizing;

use super::{run_case, Drbg};

/// Working state `(K, V, reseed_counter)` of one HMAC_DRBG instance
pub(super) struct HmacDrbg<D> {
    k: Zeroizing<Vec<u8>>,
    v: Zeroizing<Vec<u8>>,
    reseed_counter: u64,
    _digest: PhantomData<fn() -> D>,
}

impl<D: Digest + BlockSizeUser> HmacDrbg<D> {
    pub(super) fn instantiate(entropy: &[u8], nonce: &[u8], perso: &[u8]) -> Result<Self, CryptoFailure> {
        let outlen = <D as Digest>::output_size();
        let mut drbg = Self {
            k: Zeroizing::new(vec![0x00; outlen]),
            v: Zeroizing::new(vec![0x01; outlen]),
            reseed_counter: 1,
            _digest: PhantomData,
        };
        drbg.update(&[entropy, nonce, perso])?;
        Ok(drbg)
    }

    /// HMAC_DRBG_Update over the concatenation of `provided`
    fn update(&mut self, provided: &[&[u8]]) -> Result<(), CryptoFailure> {
        let has_data = provided.iter().any(|p| !p.is_empty());
        for round in [0x00u8, 0x01] {
            if round == 0x01 && !has_data {
                break;
            }
            let sep = [round];
            let mut parts: Vec<&[u8]> = Vec::with_capacity(provided.len() + 2);
            parts.push(&self.v);
            parts.push(&sep);
            parts.extend_from_slice(provided);
            let k = self.mac(&parts)?;
            self.k = k;
            let v = self.mac(&[&self.v])?;
            self.v.copy_from_slice(&v);
        }
        Ok(())
    }

    fn mac(&self, parts: &[&[u8]]) -> Result<Zeroizing<Vec<u8>>, CryptoFailure> {
        let mut mac = <SimpleHmac<D> as Mac>::new_from_slice(&self.k)
            .map_err(|e| CryptoFailure::new(format!("HMAC key rejected: {}", e)))?;
        for part in parts {
            mac.update(part);
        }
        Ok(Zeroizing::new(mac.finalize().into_bytes().to_vec()))
    }
}

impl<D: Digest + BlockSizeUser> Drbg for HmacDrbg<D> {
    fn reseed(&mut self, entropy: &[u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        self.update(&[entropy, additional])?;
        self.reseed_counter = 1;
        Ok(())
    }

    fn generate(&mut self, out: &mut [u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        if !additional.is_empty() {
            self.update(&[additional])?;
        }
        for chunk in out.chunks_mut(self.v.len()) {
            let v = self.mac(&[&self.v])?;
            self.v.copy_from_slice(&v);
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }
        self.update(&[additional])?;
        self.reseed_counter += 1;
        Ok(())
    }

    fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }
}

/// HMAC_DRBG over the SHA-2 family, selected by the group `mode`
#[derive(Debug, Default, Clone, Copy)]
pub struct HmacDrbgHandler;

fn run<D: Digest + BlockSizeUser>(case: &mut acvp_api::DrbgCase) -> HandlerResult {
    let drbg = HmacDrbg::<D>::instantiate(
        case.entropy_input.as_slice(),
        case.nonce.as_slice(),
        case.perso_string.as_slice(),
    )?;
    run_case(case, drbg)
}

impl CapabilityHandler for HmacDrbgHandler {
    fn handle(&self, case: &mut TestCase) -> HandlerResult {
        let drbg = case
            .drbg_mut()
            .ok_or_else(|| CryptoFailure::new("HMAC_DRBG handler given a non-DRBG case"))?;
        match drbg.mode.as_str() {
            "SHA2-224" => run::<Sha224>(drbg),
            "SHA2-256" => run::<Sha256>(drbg),
            "SHA2-384" => run::<Sha384>(drbg),
            "SHA2-512" => run::<Sha512>(drbg),
            "SHA2-512/224" => run::<Sha512_224>(drbg),
            "SHA2-512/256" => run::<Sha512_256>(drbg),
            other => Err(CryptoFailure::new(format!("HMAC_DRBG mode '{}' is not supported", other))),
        }
    }
}
