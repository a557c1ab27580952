//! SHA-2 and SHA-3 message digest handlers

use core::marker::PhantomData;

use acvp_api::{AlgorithmId, CapabilityHandler, CryptoFailure, HandlerResult, TestCase};
use acvp_engine::{CapabilityMetadata, CapabilityRegistry, RegistryError};
use acvp_params::utils::hash::{
    SHA224_OUTPUT_SIZE, SHA256_OUTPUT_SIZE, SHA384_OUTPUT_SIZE, SHA3_224_OUTPUT_SIZE, SHA3_256_OUTPUT_SIZE,
    SHA3_384_OUTPUT_SIZE, SHA3_512_OUTPUT_SIZE, SHA512_224_OUTPUT_SIZE, SHA512_256_OUTPUT_SIZE, SHA512_OUTPUT_SIZE,
};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};

/// Byte-oriented digest handler over any RustCrypto hash
///
/// `len` is the message length in bits; only whole bytes are supported,
/// and the message is truncated to `len / 8` bytes (so a zero-length
/// message arrives as `"00"` with `len = 0`). A digest whose length
/// differs from the one the handler was built for fails the case.
pub struct DigestHandler<D> {
    output_size: usize,
    _digest: PhantomData<fn() -> D>,
}

impl<D> DigestHandler<D> {
    pub fn new(output_size: usize) -> Self {
        Self { output_size, _digest: PhantomData }
    }

    /// Digest length in bytes this handler produces
    pub fn output_size(&self) -> usize {
        self.output_size
    }
}

impl<D: Digest> CapabilityHandler for DigestHandler<D> {
    fn handle(&self, case: &mut TestCase) -> HandlerResult {
        let hash = case
            .hash_mut()
            .ok_or_else(|| CryptoFailure::new("digest handler given a non-hash case"))?;

        if hash.len % 8 != 0 {
            return Err(CryptoFailure::new(format!("bit-oriented message length {} is not supported", hash.len)));
        }
        let n = usize::try_from(hash.len / 8)
            .map_err(|_| CryptoFailure::new("message length overflows usize"))?;
        let msg = hash.msg.as_slice().get(..n).ok_or_else(|| {
            CryptoFailure::new(format!("len {} exceeds the {} byte message", hash.len, hash.msg.len()))
        })?;

        let md = D::digest(msg);
        if md.len() != self.output_size {
            return Err(CryptoFailure::new(format!(
                "digest is {} bytes, expected {}",
                md.len(),
                self.output_size
            )));
        }
        hash.md.write(&md)?;
        Ok(())
    }
}

/// Register every SHA-2 and SHA-3 variant
pub fn register(registry: &mut CapabilityRegistry) -> Result<(), RegistryError> {
    let fips180 = |name: &str| CapabilityMetadata::new(format!("{} (FIPS 180-4)", name), "1.0");
    let fips202 = |name: &str| CapabilityMetadata::new(format!("{} (FIPS 202)", name), "2.0");

    registry.register(AlgorithmId::Sha2_224, DigestHandler::<Sha224>::new(SHA224_OUTPUT_SIZE), fips180("SHA-224"))?;
    registry.register(AlgorithmId::Sha2_256, DigestHandler::<Sha256>::new(SHA256_OUTPUT_SIZE), fips180("SHA-256"))?;
    registry.register(AlgorithmId::Sha2_384, DigestHandler::<Sha384>::new(SHA384_OUTPUT_SIZE), fips180("SHA-384"))?;
    registry.register(AlgorithmId::Sha2_512, DigestHandler::<Sha512>::new(SHA512_OUTPUT_SIZE), fips180("SHA-512"))?;
    registry.register(AlgorithmId::Sha2_512_224, DigestHandler::<Sha512_224>::new(SHA512_224_OUTPUT_SIZE), fips180("SHA-512/224"))?;
    registry.register(AlgorithmId::Sha2_512_256, DigestHandler::<Sha512_256>::new(SHA512_256_OUTPUT_SIZE), fips180("SHA-512/256"))?;
    registry.register(AlgorithmId::Sha3_224, DigestHandler::<Sha3_224>::new(SHA3_224_OUTPUT_SIZE), fips202("SHA3-224"))?;
    registry.register(AlgorithmId::Sha3_256, DigestHandler::<Sha3_256>::new(SHA3_256_OUTPUT_SIZE), fips202("SHA3-256"))?;
    registry.register(AlgorithmId::Sha3_384, DigestHandler::<Sha3_384>::new(SHA3_384_OUTPUT_SIZE), fips202("SHA3-384"))?;
    registry.register(AlgorithmId::Sha3_512, DigestHandler::<Sha3_512>::new(SHA3_512_OUTPUT_SIZE), fips202("SHA3-512"))?;
    Ok(())
}
