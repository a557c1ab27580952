//! Hash_DRBG (SP 800-90A Rev. 1, section 10.1.1)

use core::marker::PhantomData;

use acvp_api::{CapabilityHandler, CryptoFailure, DrbgCase, HandlerResult, TestCase};
use acvp_params::utils::drbg::{HASH_DRBG_SEED_LEN_LONG, HASH_DRBG_SEED_LEN_SHORT};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use zeroize::Zeroizing;

use super::{run_case, Drbg};

/// `acc = (acc + addend) mod 2^(8 * acc.len())`, both big-endian
fn add_be(acc: &mut [u8], addend: &[u8]) {
    let mut carry = 0u16;
    let mut addend = addend.iter().rev();
    for byte in acc.iter_mut().rev() {
        let sum = u16::from(*byte) + u16::from(addend.next().copied().unwrap_or(0)) + carry;
        *byte = sum as u8;
        carry = sum >> 8;
    }
}

/// Hash_df over the concatenation of `parts`, filling `out`
fn hash_df<D: Digest>(parts: &[&[u8]], out: &mut [u8]) -> Result<(), CryptoFailure> {
    let bits = u32::try_from(out.len() * 8)
        .map_err(|_| CryptoFailure::new("Hash_df output length overflows"))?
        .to_be_bytes();
    let outlen = <D as Digest>::output_size();
    for (counter, chunk) in (1u8..).zip(out.chunks_mut(outlen)) {
        let mut hasher = D::new();
        hasher.update([counter]);
        hasher.update(bits);
        for part in parts {
            hasher.update(part);
        }
        let block = hasher.finalize();
        chunk.copy_from_slice(&block[..chunk.len()]);
    }
    Ok(())
}

/// Working state `(V, C, reseed_counter)` of one Hash_DRBG instance
pub(super) struct HashDrbg<D> {
    v: Zeroizing<Vec<u8>>,
    c: Zeroizing<Vec<u8>>,
    reseed_counter: u64,
    _digest: PhantomData<fn() -> D>,
}

impl<D: Digest> HashDrbg<D> {
    fn seed_len() -> usize {
        if <D as Digest>::output_size() <= 32 {
            HASH_DRBG_SEED_LEN_SHORT
        } else {
            HASH_DRBG_SEED_LEN_LONG
        }
    }

    pub(super) fn instantiate(entropy: &[u8], nonce: &[u8], perso: &[u8]) -> Result<Self, CryptoFailure> {
        let seed_len = Self::seed_len();
        let mut drbg = Self {
            v: Zeroizing::new(vec![0; seed_len]),
            c: Zeroizing::new(vec![0; seed_len]),
            reseed_counter: 1,
            _digest: PhantomData,
        };
        hash_df::<D>(&[entropy, nonce, perso], &mut drbg.v)?;
        drbg.derive_c()?;
        Ok(drbg)
    }

    fn derive_c(&mut self) -> Result<(), CryptoFailure> {
        hash_df::<D>(&[&[0x00], &self.v], &mut self.c)
    }

    fn hash(parts: &[&[u8]]) -> Zeroizing<Vec<u8>> {
        let mut hasher = D::new();
        for part in parts {
            hasher.update(part);
        }
        Zeroizing::new(hasher.finalize().to_vec())
    }
}

impl<D: Digest> Drbg for HashDrbg<D> {
    fn reseed(&mut self, entropy: &[u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        let previous = self.v.clone();
        hash_df::<D>(&[&[0x01], &previous, entropy, additional], &mut self.v)?;
        self.derive_c()?;
        self.reseed_counter = 1;
        Ok(())
    }

    fn generate(&mut self, out: &mut [u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        if !additional.is_empty() {
            let w = Self::hash(&[&[0x02], &self.v, additional]);
            add_be(&mut self.v, &w);
        }

        // Hashgen
        let mut data = self.v.clone();
        for chunk in out.chunks_mut(<D as Digest>::output_size()) {
            let block = Self::hash(&[&data]);
            chunk.copy_from_slice(&block[..chunk.len()]);
            add_be(&mut data, &[0x01]);
        }

        let h = Self::hash(&[&[0x03], &self.v]);
        add_be(&mut self.v, &h);
        add_be(&mut self.v, &self.c);
        add_be(&mut self.v, &self.reseed_counter.to_be_bytes());
        self.reseed_counter += 1;
        Ok(())
    }

    fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }
}

/// Hash_DRBG over the SHA-2 family, selected by the group `mode`
#[derive(Debug, Default, Clone, Copy)]
pub struct HashDrbgHandler;

fn run<D: Digest>(case: &mut DrbgCase) -> HandlerResult {
    let drbg = HashDrbg::<D>::instantiate(
        case.entropy_input.as_slice(),
        case.nonce.as_slice(),
        case.perso_string.as_slice(),
    )?;
    run_case(case, drbg)
}

impl CapabilityHandler for HashDrbgHandler {
    fn handle(&self, case: &mut TestCase) -> HandlerResult {
        let drbg = case
            .drbg_mut()
            .ok_or_else(|| CryptoFailure::new("Hash_DRBG handler given a non-DRBG case"))?;
        match drbg.mode.as_str() {
            "SHA2-224" => run::<Sha224>(drbg),
            "SHA2-256" => run::<Sha256>(drbg),
            "SHA2-384" => run::<Sha384>(drbg),
            "SHA2-512" => run::<Sha512>(drbg),
            "SHA2-512/224" => run::<Sha512_224>(drbg),
            "SHA2-512/256" => run::<Sha512_256>(drbg),
            other => Err(CryptoFailure::new(format!("Hash_DRBG mode '{}' is not supported", other))),
        }
    }
}
