//! ML-DSA test cases (keyGen, sigGen, sigVer)

use super::fields::FieldSet;
use crate::error::{Error, Location, Result};
use crate::types::{AlgorithmId, CapacityBuffer, MlDsaParameterSet, TestType};

/// One ML-DSA test case
///
/// Inputs not carried by the case's mode (and outputs not yet produced)
/// are empty buffers reserved at the vector set's capacity.
#[derive(Debug, Clone)]
pub struct MlDsaCase {
    pub parameter_set: MlDsaParameterSet,
    /// Group flag; hedged signing draws `rnd` when false
    pub deterministic: bool,
    /// keyGen input
    pub seed: CapacityBuffer,
    /// sigGen AFT input when not deterministic
    pub rnd: CapacityBuffer,
    pub message: CapacityBuffer,
    /// sigGen AFT input, keyGen output
    pub sk: CapacityBuffer,
    /// sigVer input, keyGen and sigGen GDT output
    pub pk: CapacityBuffer,
    /// sigVer input, sigGen output
    pub signature: CapacityBuffer,
    /// sigVer verdict
    pub test_passed: Option<bool>,
}

impl MlDsaCase {
    /// Bind decoded fields to a case of the given mode
    pub fn from_fields(
        algorithm: AlgorithmId,
        test_type: TestType,
        mut fields: FieldSet,
        capacity: usize,
        at: Location,
    ) -> Result<Self> {
        let name = fields.require_str("parameterSet", at)?;
        let parameter_set = MlDsaParameterSet::parse(&name).ok_or_else(|| {
            Error::invalid(at.with_field("parameterSet"), format!("unknown parameter set '{}'", name))
        })?;

        let empty = |field: &'static str| {
            CapacityBuffer::try_with_capacity(capacity).map_err(|e| e.into_error(at.with_field(field)))
        };

        let case = match algorithm {
            AlgorithmId::MlDsaKeyGen => Self {
                parameter_set,
                deterministic: false,
                seed: fields.require_hex("seed", at)?,
                rnd: empty("rnd")?,
                message: empty("message")?,
                sk: empty("sk")?,
                pk: empty("pk")?,
                signature: empty("signature")?,
                test_passed: None,
            },
            AlgorithmId::MlDsaSigGen => {
                let deterministic = fields.require_bool("deterministic", at)?;
                let message = fields.require_hex("message", at)?;
                let (sk, rnd) = match test_type {
                    TestType::Aft => {
                        let sk = fields.require_hex("sk", at)?;
                        let rnd = if deterministic {
                            fields.optional_hex("rnd", capacity, at)?
                        } else {
                            fields.require_hex("rnd", at)?
                        };
                        (sk, rnd)
                    }
                    TestType::Gdt => {
                        (fields.optional_hex("sk", capacity, at)?, fields.optional_hex("rnd", capacity, at)?)
                    }
                };
                Self {
                    parameter_set,
                    deterministic,
                    seed: empty("seed")?,
                    rnd,
                    message,
                    sk,
                    pk: empty("pk")?,
                    signature: empty("signature")?,
                    test_passed: None,
                }
            }
            AlgorithmId::MlDsaSigVer => Self {
                parameter_set,
                deterministic: false,
                seed: empty("seed")?,
                rnd: empty("rnd")?,
                pk: fields.require_hex("pk", at)?,
                message: fields.require_hex("message", at)?,
                signature: fields.require_hex("signature", at)?,
                sk: empty("sk")?,
                test_passed: None,
            },
            other => {
                return Err(Error::invalid(at, format!("{} is not an ML-DSA mode", other)));
            }
        };
        Ok(case)
    }
}
