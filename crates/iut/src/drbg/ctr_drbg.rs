//! CTR_DRBG over AES (SP 800-90A Rev. 1, section 10.2.1)
//!
//! The counter covers the whole block. Without a derivation function the
//! entropy input must be exactly `seedlen` bytes; personalization and
//! additional input are zero-padded to `seedlen` and the nonce is unused.

use core::marker::PhantomData;

use acvp_api::{CapabilityHandler, CryptoFailure, DrbgCase, HandlerResult, TestCase};
use acvp_params::utils::drbg::CTR_DRBG_BLOCK_LEN;
use aes::cipher::consts::U16;
use aes::cipher::{BlockEncrypt, BlockSizeUser, KeyInit, KeySizeUser};
use aes::{Aes128, Aes192, Aes256, Block};
use zeroize::Zeroizing;

use super::{run_case, Drbg};

/// A 128-bit block cipher keyed from a byte slice
trait BlockCipher128: KeyInit + BlockEncrypt + BlockSizeUser<BlockSize = U16> {}

impl<C: KeyInit + BlockEncrypt + BlockSizeUser<BlockSize = U16>> BlockCipher128 for C {}

fn keyed<C: BlockCipher128>(key: &[u8]) -> Result<C, CryptoFailure> {
    C::new_from_slice(key).map_err(|e| CryptoFailure::new(format!("AES key rejected: {}", e)))
}

/// Big-endian increment of the whole block
fn increment(v: &mut [u8; CTR_DRBG_BLOCK_LEN]) {
    for byte in v.iter_mut().rev() {
        *byte = byte.wrapping_add(1);
        if *byte != 0 {
            break;
        }
    }
}

fn xor_into(acc: &mut [u8], other: &[u8]) {
    for (a, b) in acc.iter_mut().zip(other) {
        *a ^= b;
    }
}

/// BCC: CBC-MAC with a zero chaining value over `iv || data`
fn bcc<C: BlockCipher128>(cipher: &C, iv: &[u8], data: &[u8]) -> Block {
    let mut chain = Block::default();
    for block in core::iter::once(iv).chain(data.chunks(CTR_DRBG_BLOCK_LEN)) {
        xor_into(&mut chain, block);
        cipher.encrypt_block(&mut chain);
    }
    chain
}

/// Block_Cipher_df over the concatenation of `parts`
fn block_cipher_df<C: BlockCipher128>(parts: &[&[u8]], out_len: usize) -> Result<Zeroizing<Vec<u8>>, CryptoFailure> {
    let key_len = <C as KeySizeUser>::key_size();
    let input_len: usize = parts.iter().map(|p| p.len()).sum();
    let l = u32::try_from(input_len).map_err(|_| CryptoFailure::new("df input too long"))?;
    let n = u32::try_from(out_len).map_err(|_| CryptoFailure::new("df output too long"))?;

    let mut s = Zeroizing::new(Vec::with_capacity(input_len + 9 + CTR_DRBG_BLOCK_LEN));
    s.extend_from_slice(&l.to_be_bytes());
    s.extend_from_slice(&n.to_be_bytes());
    for part in parts {
        s.extend_from_slice(part);
    }
    s.push(0x80);
    while s.len() % CTR_DRBG_BLOCK_LEN != 0 {
        s.push(0x00);
    }

    let fixed_key: Vec<u8> = (0u8..).take(key_len).collect();
    let cipher = keyed::<C>(&fixed_key)?;
    let mut temp = Zeroizing::new(Vec::with_capacity(key_len + 2 * CTR_DRBG_BLOCK_LEN));
    let mut i = 0u32;
    while temp.len() < key_len + CTR_DRBG_BLOCK_LEN {
        let mut iv = [0u8; CTR_DRBG_BLOCK_LEN];
        iv[..4].copy_from_slice(&i.to_be_bytes());
        temp.extend_from_slice(&bcc(&cipher, &iv, &s));
        i += 1;
    }

    let cipher = keyed::<C>(&temp[..key_len])?;
    let mut x = Block::clone_from_slice(&temp[key_len..key_len + CTR_DRBG_BLOCK_LEN]);
    let mut out = Zeroizing::new(Vec::with_capacity(out_len + CTR_DRBG_BLOCK_LEN));
    while out.len() < out_len {
        cipher.encrypt_block(&mut x);
        out.extend_from_slice(&x);
    }
    out.truncate(out_len);
    Ok(out)
}

/// Working state `(Key, V, reseed_counter)` of one CTR_DRBG instance
pub(super) struct CtrDrbg<C> {
    key: Zeroizing<Vec<u8>>,
    v: Zeroizing<[u8; CTR_DRBG_BLOCK_LEN]>,
    der_func: bool,
    reseed_counter: u64,
    _cipher: PhantomData<fn() -> C>,
}

impl<C: BlockCipher128> CtrDrbg<C> {
    fn key_len() -> usize {
        <C as KeySizeUser>::key_size()
    }

    fn seed_len() -> usize {
        Self::key_len() + CTR_DRBG_BLOCK_LEN
    }

    pub(super) fn instantiate(
        entropy: &[u8],
        nonce: &[u8],
        perso: &[u8],
        der_func: bool,
    ) -> Result<Self, CryptoFailure> {
        let mut drbg = Self {
            key: Zeroizing::new(vec![0; Self::key_len()]),
            v: Zeroizing::new([0; CTR_DRBG_BLOCK_LEN]),
            der_func,
            reseed_counter: 1,
            _cipher: PhantomData,
        };
        let seed = drbg.seed_material(&[entropy, nonce, perso], entropy, perso)?;
        drbg.update(&seed)?;
        Ok(drbg)
    }

    /// Derive `seedlen` bytes from `df_input`, or XOR padded `extra` into raw entropy
    fn seed_material(
        &self,
        df_input: &[&[u8]],
        entropy: &[u8],
        extra: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoFailure> {
        if self.der_func {
            return block_cipher_df::<C>(df_input, Self::seed_len());
        }
        if entropy.len() != Self::seed_len() {
            return Err(CryptoFailure::new(format!(
                "entropy input is {} bytes, {} required without a derivation function",
                entropy.len(),
                Self::seed_len()
            )));
        }
        let mut seed = Self::padded(extra)?;
        xor_into(&mut seed, entropy);
        Ok(seed)
    }

    fn padded(input: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoFailure> {
        let seed_len = Self::seed_len();
        if input.len() > seed_len {
            return Err(CryptoFailure::new(format!(
                "input is {} bytes, at most {} allowed without a derivation function",
                input.len(),
                seed_len
            )));
        }
        let mut out = Zeroizing::new(vec![0; seed_len]);
        out[..input.len()].copy_from_slice(input);
        Ok(out)
    }

    /// CTR_DRBG_Update with `provided` of exactly `seedlen` bytes
    fn update(&mut self, provided: &[u8]) -> Result<(), CryptoFailure> {
        let key_len = Self::key_len();
        let seed_len = Self::seed_len();
        let cipher = keyed::<C>(&self.key)?;
        let mut temp = Zeroizing::new(Vec::with_capacity(seed_len + CTR_DRBG_BLOCK_LEN));
        while temp.len() < seed_len {
            increment(&mut self.v);
            let mut block = Block::clone_from_slice(&self.v[..]);
            cipher.encrypt_block(&mut block);
            temp.extend_from_slice(&block);
        }
        temp.truncate(seed_len);
        xor_into(&mut temp, provided);
        self.key.copy_from_slice(&temp[..key_len]);
        self.v.copy_from_slice(&temp[key_len..]);
        Ok(())
    }
}

impl<C: BlockCipher128> Drbg for CtrDrbg<C> {
    fn reseed(&mut self, entropy: &[u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        let seed = self.seed_material(&[entropy, additional], entropy, additional)?;
        self.update(&seed)?;
        self.reseed_counter = 1;
        Ok(())
    }

    fn generate(&mut self, out: &mut [u8], additional: &[u8]) -> Result<(), CryptoFailure> {
        let additional = if additional.is_empty() {
            Zeroizing::new(vec![0; Self::seed_len()])
        } else {
            let conditioned = if self.der_func {
                block_cipher_df::<C>(&[additional], Self::seed_len())?
            } else {
                Self::padded(additional)?
            };
            self.update(&conditioned)?;
            conditioned
        };

        let cipher = keyed::<C>(&self.key)?;
        for chunk in out.chunks_mut(CTR_DRBG_BLOCK_LEN) {
            increment(&mut self.v);
            let mut block = Block::clone_from_slice(&self.v[..]);
            cipher.encrypt_block(&mut block);
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        self.update(&additional)?;
        self.reseed_counter += 1;
        Ok(())
    }

    fn reseed_counter(&self) -> u64 {
        self.reseed_counter
    }
}

/// CTR_DRBG over AES-128, AES-192 and AES-256, selected by the group `mode`
#[derive(Debug, Default, Clone, Copy)]
pub struct CtrDrbgHandler;

fn run<C: BlockCipher128>(case: &mut DrbgCase) -> HandlerResult {
    let drbg = CtrDrbg::<C>::instantiate(
        case.entropy_input.as_slice(),
        case.nonce.as_slice(),
        case.perso_string.as_slice(),
        case.der_func,
    )?;
    run_case(case, drbg)
}

impl CapabilityHandler for CtrDrbgHandler {
    fn handle(&self, case: &mut TestCase) -> HandlerResult {
        let drbg = case
            .drbg_mut()
            .ok_or_else(|| CryptoFailure::new("CTR_DRBG handler given a non-DRBG case"))?;
        match drbg.mode.as_str() {
            "AES-128" => run::<Aes128>(drbg),
            "AES-192" => run::<Aes192>(drbg),
            "AES-256" => run::<Aes256>(drbg),
            other => Err(CryptoFailure::new(format!("CTR_DRBG mode '{}' is not supported", other))),
        }
    }
}
