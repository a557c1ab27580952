//! Constants for the ML-DSA signature algorithm (FIPS 204)

/// Key generation seed (xi) size in bytes
pub const ML_DSA_SEED_BYTES: usize = 32;

/// Hedged signing randomness size in bytes
pub const ML_DSA_RND_BYTES: usize = 32;

/// Capacity reserved for every ML-DSA hex field
///
/// Covers the largest object (an ML-DSA-87 secret key) and messages of up
/// to 65536 bits.
pub const ML_DSA_BUFFER_CAPACITY: usize = 16384;

/// Common trait for ML-DSA parameter sets
pub trait MlDsaParams: Send + Sync + 'static {
    /// Parameter set name, as used in `parameterSet`
    const NAME: &'static str;

    /// Public key size in bytes
    const PUBLIC_KEY_BYTES: usize;
    /// Secret key size in bytes
    const SECRET_KEY_BYTES: usize;
    /// Signature size in bytes
    const SIGNATURE_BYTES: usize;
}

/// ML-DSA-44 (NIST security category 2)
pub struct MlDsa44Params;

impl MlDsaParams for MlDsa44Params {
    const NAME: &'static str = "ML-DSA-44";
    const PUBLIC_KEY_BYTES: usize = 1312;
    const SECRET_KEY_BYTES: usize = 2560;
    const SIGNATURE_BYTES: usize = 2420;
}

/// ML-DSA-65 (NIST security category 3)
pub struct MlDsa65Params;

impl MlDsaParams for MlDsa65Params {
    const NAME: &'static str = "ML-DSA-65";
    const PUBLIC_KEY_BYTES: usize = 1952;
    const SECRET_KEY_BYTES: usize = 4032;
    const SIGNATURE_BYTES: usize = 3309;
}

/// ML-DSA-87 (NIST security category 5)
pub struct MlDsa87Params;

impl MlDsaParams for MlDsa87Params {
    const NAME: &'static str = "ML-DSA-87";
    const PUBLIC_KEY_BYTES: usize = 2592;
    const SECRET_KEY_BYTES: usize = 4896;
    const SIGNATURE_BYTES: usize = 4627;
}

/// Byte sizes of one parameter set's objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlDsaSizes {
    pub public_key: usize,
    pub secret_key: usize,
    pub signature: usize,
}

impl MlDsaSizes {
    /// Sizes of a parameter set given by type
    pub const fn of<P: MlDsaParams>() -> Self {
        Self {
            public_key: P::PUBLIC_KEY_BYTES,
            secret_key: P::SECRET_KEY_BYTES,
            signature: P::SIGNATURE_BYTES,
        }
    }

    /// Sizes of a parameter set given by name
    pub fn by_name(name: &str) -> Option<Self> {
        if name == MlDsa44Params::NAME {
            Some(Self::of::<MlDsa44Params>())
        } else if name == MlDsa65Params::NAME {
            Some(Self::of::<MlDsa65Params>())
        } else if name == MlDsa87Params::NAME {
            Some(Self::of::<MlDsa87Params>())
        } else {
            None
        }
    }
}
