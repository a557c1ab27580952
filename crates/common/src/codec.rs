//! Hex codec for test-vector fields
//!
//! Decoding accepts either case; encoding always produces uppercase, which
//! is what the validation server emits and compares against.

use acvp_api::{BufferError, CapacityBuffer};
use thiserror::Error;

/// Errors raised while converting between hex strings and byte buffers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Odd length or a non-hex character
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Decoded or encoded data does not fit
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Decode `hex` into a freshly reserved buffer of `capacity` bytes
///
/// The empty string decodes to an empty buffer.
pub fn hex_to_bin(hex: &str, capacity: usize) -> Result<CapacityBuffer, CodecError> {
    if hex.len() % 2 != 0 {
        return Err(CodecError::InvalidHex(hex::FromHexError::OddLength));
    }
    let byte_len = hex.len() / 2;
    if byte_len > capacity {
        return Err(BufferError::CapacityExceeded { requested: byte_len, capacity }.into());
    }

    let mut buf = CapacityBuffer::try_with_capacity(capacity)?;
    let dst = buf.prepare(byte_len)?;
    if let Err(e) = hex::decode_to_slice(hex, dst) {
        buf.clear();
        return Err(e.into());
    }
    Ok(buf)
}

/// Encode `bytes` as uppercase hex, refusing output longer than `max_hex_len`
pub fn bin_to_hex(bytes: &[u8], max_hex_len: usize) -> Result<String, CodecError> {
    let hex_len = bytes.len() * 2;
    if hex_len > max_hex_len {
        return Err(BufferError::CapacityExceeded { requested: hex_len, capacity: max_hex_len }.into());
    }
    Ok(hex::encode_upper(bytes))
}
