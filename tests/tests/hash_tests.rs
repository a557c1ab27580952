// tests/hash_tests.rs
use acvp_api::ErrorKind;
use acvp_engine::VectorSetProcessor;
use acvp_tests::{init_tracing, load_expected, load_prompt};
use serde_json::json;

fn run_suite(suite: &str) {
    init_tracing();
    let registry = acvp_iut::registry().expect("shipped registry");
    let prompt = load_prompt(suite).unwrap_or_else(|e| panic!("failed to load {}: {}", suite, e));
    let expected = load_expected(suite).unwrap_or_else(|e| panic!("failed to load {}: {}", suite, e));

    let response = VectorSetProcessor::new(registry)
        .process(&prompt)
        .unwrap_or_else(|e| panic!("{} failed: {}", suite, e));
    assert_eq!(response.to_value().unwrap(), expected, "{} response differs", suite);
}

#[test]
fn test_sha2_256_vectors() {
    run_suite("SHA2-256");
}

#[test]
fn test_sha2_512_224_vectors() {
    run_suite("SHA2-512-224");
}

#[test]
fn test_sha3_384_vectors() {
    run_suite("SHA3-384");
}

#[test]
fn test_groups_and_cases_keep_document_order() {
    let registry = acvp_iut::registry().unwrap();
    let request = json!({
        "vsId": 5,
        "algorithm": "SHA3-256",
        "testGroups": [
            { "tgId": 9, "testType": "AFT", "tests": [
                { "tcId": 30, "msg": "00", "len": 0 },
                { "tcId": 10, "msg": "616263", "len": 24 }
            ]},
            { "tgId": 2, "testType": "AFT", "tests": [
                { "tcId": 20, "msg": "616263", "len": 24 }
            ]}
        ]
    });
    let doc = VectorSetProcessor::new(registry).process(&request).unwrap();
    let ids: Vec<(u64, Vec<u64>)> = doc
        .test_groups
        .iter()
        .map(|g| (g.tg_id, g.tests.iter().map(|t| t.tc_id).collect()))
        .collect();
    assert_eq!(ids, vec![(9, vec![30, 10]), (2, vec![20])]);
    assert_eq!(
        doc.test_groups[0].tests[0].outputs["md"],
        "A7FFC6F8BF1ED76651C14756A061D662F580FF4DE43B49FA82D80A4B80F8434A"
    );
    assert_eq!(doc.test_groups[1].tests[0].outputs, doc.test_groups[0].tests[1].outputs);
}

#[test]
fn test_bit_oriented_message_is_a_module_failure() {
    let registry = acvp_iut::registry().unwrap();
    let request = json!({
        "algorithm": "SHA2-256",
        "testGroups": [{ "tgId": 1, "testType": "AFT", "tests": [
            { "tcId": 4, "msg": "80", "len": 1 }
        ]}]
    });
    let err = VectorSetProcessor::new(registry).process(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CryptoModuleFailure);
    let at = err.location().unwrap();
    assert_eq!((at.tg_id, at.tc_id), (Some(1), Some(4)));
}

#[test]
fn test_hash_has_no_gdt_row() {
    let registry = acvp_iut::registry().unwrap();
    let request = json!({
        "algorithm": "SHA2-384",
        "testGroups": [{ "tgId": 1, "testType": "GDT", "tests": [{ "tcId": 1, "msg": "00", "len": 0 }] }]
    });
    let err = VectorSetProcessor::new(registry).process(&request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
}
