//! SP 800-90A DRBG test cases

use super::fields::FieldSet;
use crate::error::{Error, Location, Result};
use crate::types::CapacityBuffer;

/// What an `otherInput` record is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrbgUse {
    ReSeed,
    Generate,
}

impl DrbgUse {
    pub const NAMES: [&'static str; 2] = ["reSeed", "generate"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reSeed" => Some(Self::ReSeed),
            "generate" => Some(Self::Generate),
            _ => None,
        }
    }
}

/// One step of a DRBG test after instantiation
#[derive(Debug, Clone)]
pub struct DrbgOtherInput {
    pub intended_use: DrbgUse,
    pub additional_input: CapacityBuffer,
    /// Entropy for an explicit reseed, or for prediction resistance
    pub entropy_input: CapacityBuffer,
}

/// One DRBG AFT case
///
/// The handler instantiates from `entropy_input`/`nonce`/`perso_string`,
/// walks `other_input` in order and leaves the final generate's output in
/// `returned_bits`.
#[derive(Debug, Clone)]
pub struct DrbgCase {
    /// Underlying primitive, e.g. `SHA2-256` or `AES-128`
    pub mode: String,
    pub der_func: bool,
    pub pred_resistance: bool,
    pub reseed: bool,
    /// Requested output length in bits
    pub returned_bits_len: u64,
    pub entropy_input: CapacityBuffer,
    pub nonce: CapacityBuffer,
    pub perso_string: CapacityBuffer,
    pub other_input: Vec<DrbgOtherInput>,
    pub returned_bits: CapacityBuffer,
}

impl DrbgCase {
    pub fn from_fields(mut fields: FieldSet, capacity: usize, at: Location) -> Result<Self> {
        let mode = fields.require_str("mode", at)?;
        let der_func = fields.optional_bool("derFunc", at)?;
        let pred_resistance = fields.require_bool("predResistance", at)?;
        let reseed = fields.require_bool("reSeed", at)?;
        let returned_bits_len = fields.require_int("returnedBitsLen", at)?;
        if returned_bits_len % 8 != 0 || returned_bits_len / 8 > capacity as u64 {
            return Err(Error::malformed(
                at.with_field("returnedBitsLen"),
                format!("{} bits cannot be returned in a {} byte buffer", returned_bits_len, capacity),
            ));
        }

        let entropy_input = fields.require_hex("entropyInput", at)?;
        let nonce = fields.require_hex("nonce", at)?;
        let perso_string = fields.optional_hex("persoString", capacity, at)?;

        let records = fields.require_records("otherInput", at)?;
        let mut other_input = Vec::with_capacity(records.len());
        for mut record in records {
            let use_name = record.require_str("intendedUse", at)?;
            let intended_use = DrbgUse::parse(&use_name).ok_or_else(|| {
                Error::invalid(at.with_field("intendedUse"), format!("unknown use '{}'", use_name))
            })?;
            other_input.push(DrbgOtherInput {
                intended_use,
                additional_input: record.require_hex("additionalInput", at)?,
                entropy_input: record.require_hex("entropyInput", at)?,
            });
        }

        let returned_bits = CapacityBuffer::try_with_capacity(capacity)
            .map_err(|e| e.into_error(at.with_field("returnedBits")))?;

        Ok(Self {
            mode,
            der_func,
            pred_resistance,
            reseed,
            returned_bits_len,
            entropy_input,
            nonce,
            perso_string,
            other_input,
            returned_bits,
        })
    }
}
