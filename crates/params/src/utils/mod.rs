//! Constants for hash functions and DRBGs

pub mod drbg;
pub mod hash;
