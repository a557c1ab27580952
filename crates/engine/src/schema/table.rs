//! The shipped schema rows

use super::{FieldKind, FieldSpec, OutputSpec, SchemaRow};
use acvp_api::{AlgorithmId, DrbgUse, MlDsaParameterSet, TestType};
use acvp_params::pqc::ml_dsa::ML_DSA_BUFFER_CAPACITY;
use acvp_params::utils::drbg::DRBG_BUFFER_CAPACITY;
use acvp_params::utils::hash::HASH_BUFFER_CAPACITY;

const PARAMETER_SET: FieldSpec =
    FieldSpec::required("parameterSet", FieldKind::Choice(&MlDsaParameterSet::NAMES));
const DETERMINISTIC: FieldSpec = FieldSpec::required("deterministic", FieldKind::Bool);

const ML_DSA_KEY_GEN_AFT: SchemaRow = SchemaRow {
    algorithms: &[AlgorithmId::MlDsaKeyGen],
    test_type: TestType::Aft,
    group: &[PARAMETER_SET],
    test: &[FieldSpec::required("seed", FieldKind::Hex)],
    outputs: &[OutputSpec::hex("pk"), OutputSpec::hex("sk")],
    group_outputs: &[],
    capacity: ML_DSA_BUFFER_CAPACITY,
};

const ML_DSA_SIG_GEN_AFT: SchemaRow = SchemaRow {
    algorithms: &[AlgorithmId::MlDsaSigGen],
    test_type: TestType::Aft,
    group: &[PARAMETER_SET, DETERMINISTIC],
    test: &[
        FieldSpec::required("message", FieldKind::Hex),
        FieldSpec::required("sk", FieldKind::Hex),
        FieldSpec::required_unless("rnd", FieldKind::Hex, "deterministic"),
    ],
    outputs: &[OutputSpec::hex("signature")],
    group_outputs: &[],
    capacity: ML_DSA_BUFFER_CAPACITY,
};

const ML_DSA_SIG_GEN_GDT: SchemaRow = SchemaRow {
    algorithms: &[AlgorithmId::MlDsaSigGen],
    test_type: TestType::Gdt,
    group: &[PARAMETER_SET, DETERMINISTIC],
    test: &[FieldSpec::required("message", FieldKind::Hex)],
    outputs: &[OutputSpec::hex("signature")],
    group_outputs: &[OutputSpec::hex("pk")],
    capacity: ML_DSA_BUFFER_CAPACITY,
};

const ML_DSA_SIG_VER_AFT: SchemaRow = SchemaRow {
    algorithms: &[AlgorithmId::MlDsaSigVer],
    test_type: TestType::Aft,
    group: &[PARAMETER_SET, FieldSpec::required("pk", FieldKind::Hex)],
    test: &[
        FieldSpec::required("message", FieldKind::Hex),
        FieldSpec::required("signature", FieldKind::Hex),
    ],
    outputs: &[OutputSpec::bool("testPassed")],
    group_outputs: &[],
    capacity: ML_DSA_BUFFER_CAPACITY,
};

const HASH_AFT: SchemaRow = SchemaRow {
    algorithms: &[
        AlgorithmId::Sha2_224,
        AlgorithmId::Sha2_256,
        AlgorithmId::Sha2_384,
        AlgorithmId::Sha2_512,
        AlgorithmId::Sha2_512_224,
        AlgorithmId::Sha2_512_256,
        AlgorithmId::Sha3_224,
        AlgorithmId::Sha3_256,
        AlgorithmId::Sha3_384,
        AlgorithmId::Sha3_512,
    ],
    test_type: TestType::Aft,
    group: &[],
    test: &[
        FieldSpec::required("msg", FieldKind::Hex),
        FieldSpec::required("len", FieldKind::Int),
    ],
    outputs: &[OutputSpec::hex("md")],
    group_outputs: &[],
    capacity: HASH_BUFFER_CAPACITY,
};

const DRBG_OTHER_INPUT: &[FieldSpec] = &[
    FieldSpec::required("intendedUse", FieldKind::Choice(&DrbgUse::NAMES)),
    FieldSpec::required("additionalInput", FieldKind::Hex),
    FieldSpec::required("entropyInput", FieldKind::Hex),
];

const DRBG_AFT: SchemaRow = SchemaRow {
    algorithms: &[AlgorithmId::HashDrbg, AlgorithmId::HmacDrbg, AlgorithmId::CtrDrbg],
    test_type: TestType::Aft,
    group: &[
        FieldSpec::required("mode", FieldKind::Str),
        FieldSpec::optional("derFunc", FieldKind::Bool),
        FieldSpec::required("predResistance", FieldKind::Bool),
        FieldSpec::required("reSeed", FieldKind::Bool),
        FieldSpec::required("entropyInputLen", FieldKind::Int),
        FieldSpec::required("nonceLen", FieldKind::Int),
        FieldSpec::required("persoStringLen", FieldKind::Int),
        FieldSpec::required("additionalInputLen", FieldKind::Int),
        FieldSpec::required("returnedBitsLen", FieldKind::Int),
    ],
    test: &[
        FieldSpec::required("entropyInput", FieldKind::Hex),
        FieldSpec::required("nonce", FieldKind::Hex),
        FieldSpec::optional("persoString", FieldKind::Hex),
        FieldSpec::required("otherInput", FieldKind::Records(DRBG_OTHER_INPUT)),
    ],
    outputs: &[OutputSpec::hex("returnedBits")],
    group_outputs: &[],
    capacity: DRBG_BUFFER_CAPACITY,
};

/// Every shipped row
pub static ROWS: [SchemaRow; 6] = [
    ML_DSA_KEY_GEN_AFT,
    ML_DSA_SIG_GEN_AFT,
    ML_DSA_SIG_GEN_GDT,
    ML_DSA_SIG_VER_AFT,
    HASH_AFT,
    DRBG_AFT,
];
