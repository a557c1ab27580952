//! Typed test-case model handed to capability handlers
//!
//! The engine decodes the JSON of a test case (merged with its group's
//! fields) into a [`FieldSet`], then binds it here into a per-family
//! payload. Handlers read inputs from and write outputs into the payload;
//! the engine then reads the outputs back by protocol name.

mod drbg;
mod fields;
mod hash;
mod ml_dsa;

pub use drbg::{DrbgCase, DrbgOtherInput, DrbgUse};
pub use fields::{FieldSet, FieldValue};
pub use hash::HashCase;
pub use ml_dsa::MlDsaCase;

use crate::error::{Location, Result};
use crate::types::{AlgorithmFamily, AlgorithmId, CapacityBuffer, TestType};

/// Per-family payload of a test case
#[derive(Debug, Clone)]
pub enum CasePayload {
    MlDsa(MlDsaCase),
    Hash(HashCase),
    Drbg(DrbgCase),
}

/// A produced output, borrowed from the case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputValue<'a> {
    Hex(&'a [u8]),
    Bool(bool),
}

/// One test case, as seen by a capability handler
#[derive(Debug, Clone)]
pub struct TestCase {
    pub tg_id: u64,
    pub tc_id: u64,
    pub algorithm: AlgorithmId,
    pub test_type: TestType,
    /// Set on the first case of each group
    ///
    /// GDT handlers use it to (re)generate the material the group shares.
    pub first_in_group: bool,
    pub payload: CasePayload,
}

impl TestCase {
    /// Bind decoded fields to a typed case
    ///
    /// `capacity` bounds every output buffer reserved for the case.
    pub fn from_fields(
        algorithm: AlgorithmId,
        test_type: TestType,
        tg_id: u64,
        tc_id: u64,
        first_in_group: bool,
        fields: FieldSet,
        capacity: usize,
    ) -> Result<Self> {
        let at = Location::case(tg_id, tc_id);
        let payload = match algorithm.family() {
            AlgorithmFamily::MlDsa => {
                CasePayload::MlDsa(MlDsaCase::from_fields(algorithm, test_type, fields, capacity, at)?)
            }
            AlgorithmFamily::Sha2 | AlgorithmFamily::Sha3 => {
                CasePayload::Hash(HashCase::from_fields(fields, capacity, at)?)
            }
            AlgorithmFamily::Drbg => CasePayload::Drbg(DrbgCase::from_fields(fields, capacity, at)?),
        };
        Ok(Self { tg_id, tc_id, algorithm, test_type, first_in_group, payload })
    }

    /// Read an output back by its protocol name
    ///
    /// Returns `None` if the name is not an output of this case, or if the
    /// handler left it unwritten.
    pub fn output(&self, name: &str) -> Option<OutputValue<'_>> {
        fn hex(buf: &CapacityBuffer) -> Option<OutputValue<'_>> {
            if buf.is_empty() {
                None
            } else {
                Some(OutputValue::Hex(buf.as_slice()))
            }
        }
        match (&self.payload, name) {
            (CasePayload::MlDsa(c), "pk") => hex(&c.pk),
            (CasePayload::MlDsa(c), "sk") => hex(&c.sk),
            (CasePayload::MlDsa(c), "signature") => hex(&c.signature),
            (CasePayload::MlDsa(c), "testPassed") => c.test_passed.map(OutputValue::Bool),
            (CasePayload::Hash(c), "md") => hex(&c.md),
            (CasePayload::Drbg(c), "returnedBits") => hex(&c.returned_bits),
            _ => None,
        }
    }

    pub fn ml_dsa_mut(&mut self) -> Option<&mut MlDsaCase> {
        match &mut self.payload {
            CasePayload::MlDsa(c) => Some(c),
            _ => None,
        }
    }

    pub fn hash_mut(&mut self) -> Option<&mut HashCase> {
        match &mut self.payload {
            CasePayload::Hash(c) => Some(c),
            _ => None,
        }
    }

    pub fn drbg_mut(&mut self) -> Option<&mut DrbgCase> {
        match &mut self.payload {
            CasePayload::Drbg(c) => Some(c),
            _ => None,
        }
    }
}
