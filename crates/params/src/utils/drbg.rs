//! Constants for SP 800-90A DRBGs

/// Capacity reserved for every DRBG hex field
///
/// Large enough for 4096 returned bits and generous entropy inputs.
pub const DRBG_BUFFER_CAPACITY: usize = 1024;

/// Maximum number of generate requests between reseeds (SP 800-90A, table 2)
pub const DRBG_RESEED_INTERVAL: u64 = 1 << 48;

/// Maximum bytes per generate request (2^19 bits)
pub const DRBG_MAX_BYTES_PER_REQUEST: usize = 1 << 16;

/// Hash_DRBG seed length in bytes for digests of up to 256 bits (440 bits)
pub const HASH_DRBG_SEED_LEN_SHORT: usize = 55;

/// Hash_DRBG seed length in bytes for SHA-384 and SHA-512 (888 bits)
pub const HASH_DRBG_SEED_LEN_LONG: usize = 111;

/// Block length of the CTR_DRBG block cipher (AES)
pub const CTR_DRBG_BLOCK_LEN: usize = 16;
