//! Constants for hash functions

/// Output size of SHA-224 in bytes
pub const SHA224_OUTPUT_SIZE: usize = 28;

/// Output size of SHA-256 in bytes
pub const SHA256_OUTPUT_SIZE: usize = 32;

/// Output size of SHA-384 in bytes
pub const SHA384_OUTPUT_SIZE: usize = 48;

/// Output size of SHA-512 in bytes
pub const SHA512_OUTPUT_SIZE: usize = 64;

/// Output size of SHA-512/224 in bytes
pub const SHA512_224_OUTPUT_SIZE: usize = 28;

/// Output size of SHA-512/256 in bytes
pub const SHA512_256_OUTPUT_SIZE: usize = 32;

/// Output size of SHA3-224 in bytes
pub const SHA3_224_OUTPUT_SIZE: usize = 28;

/// Output size of SHA3-256 in bytes
pub const SHA3_256_OUTPUT_SIZE: usize = 32;

/// Output size of SHA3-384 in bytes
pub const SHA3_384_OUTPUT_SIZE: usize = 48;

/// Output size of SHA3-512 in bytes
pub const SHA3_512_OUTPUT_SIZE: usize = 64;

/// Capacity reserved for every hash hex field (messages up to 65536 bits)
pub const HASH_BUFFER_CAPACITY: usize = 8192;
