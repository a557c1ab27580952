//! SHA-2 / SHA-3 message digest test cases

use super::fields::FieldSet;
use crate::error::{Location, Result};
use crate::types::CapacityBuffer;

/// One AFT digest case
#[derive(Debug, Clone)]
pub struct HashCase {
    pub msg: CapacityBuffer,
    /// Message length in bits
    pub len: u64,
    /// Digest output
    pub md: CapacityBuffer,
}

impl HashCase {
    pub fn from_fields(mut fields: FieldSet, capacity: usize, at: Location) -> Result<Self> {
        let msg = fields.require_hex("msg", at)?;
        let len = fields.require_int("len", at)?;
        let md = CapacityBuffer::try_with_capacity(capacity)
            .map_err(|e| e.into_error(at.with_field("md")))?;
        Ok(Self { msg, len, md })
    }
}
