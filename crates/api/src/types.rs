//! Core types shared by the engine and the capability handlers
//!
//! This module provides the closed enumerations the engine resolves request
//! strings into as early as possible, and the capacity-checked buffer every
//! hex field of a test case lives in.

use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::BufferError;

/// Algorithm family as named by the `algorithm` field of a vector set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// FIPS 204 module-lattice signatures; qualified by `mode`
    MlDsa,
    /// SHA-2 message digests
    Sha2,
    /// SHA-3 message digests
    Sha3,
    /// SP 800-90A deterministic random bit generators
    Drbg,
}

impl AlgorithmFamily {
    /// Family of a protocol algorithm name, if known
    pub fn from_name(algorithm: &str) -> Option<Self> {
        match algorithm {
            "ML-DSA" => Some(Self::MlDsa),
            "SHA2-224" | "SHA2-256" | "SHA2-384" | "SHA2-512" | "SHA2-512/224"
            | "SHA2-512/256" => Some(Self::Sha2),
            "SHA3-224" | "SHA3-256" | "SHA3-384" | "SHA3-512" => Some(Self::Sha3),
            "hashDRBG" | "hmacDRBG" | "ctrDRBG" => Some(Self::Drbg),
            _ => None,
        }
    }

    /// Whether vector sets of this family carry a top-level `mode`
    pub fn requires_mode(self) -> bool {
        matches!(self, Self::MlDsa)
    }
}

/// Canonical identifier of an algorithm/mode pair
///
/// Request strings are resolved into this enum once per vector set; all
/// further dispatch (registry, schema, response shape) keys on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlgorithmId {
    MlDsaKeyGen,
    MlDsaSigGen,
    MlDsaSigVer,
    Sha2_224,
    Sha2_256,
    Sha2_384,
    Sha2_512,
    Sha2_512_224,
    Sha2_512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    HashDrbg,
    HmacDrbg,
    CtrDrbg,
}

impl AlgorithmId {
    /// Every identifier, in declaration order
    pub const ALL: [AlgorithmId; 16] = [
        Self::MlDsaKeyGen,
        Self::MlDsaSigGen,
        Self::MlDsaSigVer,
        Self::Sha2_224,
        Self::Sha2_256,
        Self::Sha2_384,
        Self::Sha2_512,
        Self::Sha2_512_224,
        Self::Sha2_512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::HashDrbg,
        Self::HmacDrbg,
        Self::CtrDrbg,
    ];

    /// Resolve the `algorithm`/`mode` strings of a request
    ///
    /// Returns `None` for any combination this engine does not know,
    /// including a `mode` on a family that has none.
    pub fn resolve(algorithm: &str, mode: Option<&str>) -> Option<Self> {
        let id = match (algorithm, mode) {
            ("ML-DSA", Some("keyGen")) => Self::MlDsaKeyGen,
            ("ML-DSA", Some("sigGen")) => Self::MlDsaSigGen,
            ("ML-DSA", Some("sigVer")) => Self::MlDsaSigVer,
            (_, Some(_)) => return None,
            ("SHA2-224", None) => Self::Sha2_224,
            ("SHA2-256", None) => Self::Sha2_256,
            ("SHA2-384", None) => Self::Sha2_384,
            ("SHA2-512", None) => Self::Sha2_512,
            ("SHA2-512/224", None) => Self::Sha2_512_224,
            ("SHA2-512/256", None) => Self::Sha2_512_256,
            ("SHA3-224", None) => Self::Sha3_224,
            ("SHA3-256", None) => Self::Sha3_256,
            ("SHA3-384", None) => Self::Sha3_384,
            ("SHA3-512", None) => Self::Sha3_512,
            ("hashDRBG", None) => Self::HashDrbg,
            ("hmacDRBG", None) => Self::HmacDrbg,
            ("ctrDRBG", None) => Self::CtrDrbg,
            _ => return None,
        };
        Some(id)
    }

    /// The protocol `algorithm` string
    pub fn algorithm(self) -> &'static str {
        match self {
            Self::MlDsaKeyGen | Self::MlDsaSigGen | Self::MlDsaSigVer => "ML-DSA",
            Self::Sha2_224 => "SHA2-224",
            Self::Sha2_256 => "SHA2-256",
            Self::Sha2_384 => "SHA2-384",
            Self::Sha2_512 => "SHA2-512",
            Self::Sha2_512_224 => "SHA2-512/224",
            Self::Sha2_512_256 => "SHA2-512/256",
            Self::Sha3_224 => "SHA3-224",
            Self::Sha3_256 => "SHA3-256",
            Self::Sha3_384 => "SHA3-384",
            Self::Sha3_512 => "SHA3-512",
            Self::HashDrbg => "hashDRBG",
            Self::HmacDrbg => "hmacDRBG",
            Self::CtrDrbg => "ctrDRBG",
        }
    }

    /// The protocol `mode` string, for mode-qualified families
    pub fn mode(self) -> Option<&'static str> {
        match self {
            Self::MlDsaKeyGen => Some("keyGen"),
            Self::MlDsaSigGen => Some("sigGen"),
            Self::MlDsaSigVer => Some("sigVer"),
            _ => None,
        }
    }

    /// The family this identifier belongs to
    pub fn family(self) -> AlgorithmFamily {
        match self {
            Self::MlDsaKeyGen | Self::MlDsaSigGen | Self::MlDsaSigVer => AlgorithmFamily::MlDsa,
            Self::Sha2_224
            | Self::Sha2_256
            | Self::Sha2_384
            | Self::Sha2_512
            | Self::Sha2_512_224
            | Self::Sha2_512_256 => AlgorithmFamily::Sha2,
            Self::Sha3_224 | Self::Sha3_256 | Self::Sha3_384 | Self::Sha3_512 => {
                AlgorithmFamily::Sha3
            }
            Self::HashDrbg | Self::HmacDrbg | Self::CtrDrbg => AlgorithmFamily::Drbg,
        }
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode() {
            Some(mode) => write!(f, "{}/{}", self.algorithm(), mode),
            None => f.write_str(self.algorithm()),
        }
    }
}

/// Test-type category of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestType {
    /// Algorithm functional test: independent cases
    Aft,
    /// Generated-data test: cases share group-derived material
    Gdt,
}

impl TestType {
    /// Parse the `testType` string; anything else is rejected
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AFT" => Some(Self::Aft),
            "GDT" => Some(Self::Gdt),
            _ => None,
        }
    }

    /// Protocol spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aft => "AFT",
            Self::Gdt => "GDT",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ML-DSA parameter sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MlDsaParameterSet {
    MlDsa44,
    MlDsa65,
    MlDsa87,
}

impl MlDsaParameterSet {
    /// Protocol names, in the order of the variants
    pub const NAMES: [&'static str; 3] = ["ML-DSA-44", "ML-DSA-65", "ML-DSA-87"];

    /// Parse a `parameterSet` value
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ML-DSA-44" => Some(Self::MlDsa44),
            "ML-DSA-65" => Some(Self::MlDsa65),
            "ML-DSA-87" => Some(Self::MlDsa87),
            _ => None,
        }
    }

    /// Protocol name
    pub fn name(self) -> &'static str {
        match self {
            Self::MlDsa44 => Self::NAMES[0],
            Self::MlDsa65 => Self::NAMES[1],
            Self::MlDsa87 => Self::NAMES[2],
        }
    }
}

/// Owned byte buffer with a fixed capacity and explicit length
///
/// The full capacity is reserved (fallibly) and zero-filled up front; the
/// logical length never exceeds it. Contents are zeroized on drop.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CapacityBuffer {
    data: Vec<u8>,
    len: usize,
}

impl CapacityBuffer {
    /// Reserve a zero-filled buffer of `capacity` bytes
    pub fn try_with_capacity(capacity: usize) -> Result<Self, BufferError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| BufferError::Allocation { capacity })?;
        data.resize(capacity, 0);
        Ok(Self { data, len: 0 })
    }

    /// Reserve a buffer and copy `bytes` into it
    pub fn try_from_slice(bytes: &[u8], capacity: usize) -> Result<Self, BufferError> {
        let mut buf = Self::try_with_capacity(capacity)?;
        buf.write(bytes)?;
        Ok(buf)
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been written
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of bytes the buffer holds
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The written bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Replace the contents with `bytes`
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.prepare(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// Zero the buffer, set its length and hand out the writable prefix
    pub fn prepare(&mut self, len: usize) -> Result<&mut [u8], BufferError> {
        if len > self.capacity() {
            return Err(BufferError::CapacityExceeded { requested: len, capacity: self.capacity() });
        }
        self.data.iter_mut().for_each(|b| *b = 0);
        self.len = len;
        Ok(&mut self.data[..len])
    }

    /// Zero the contents and reset the length, keeping the capacity
    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|b| *b = 0);
        self.len = 0;
    }
}

impl AsRef<[u8]> for CapacityBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for CapacityBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapacityBuffer<{}/{}>([REDACTED])", self.len, self.capacity())
    }
}
