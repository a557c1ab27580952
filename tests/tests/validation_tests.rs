// tests/validation_tests.rs
//
// Request validation through the full processor, driven by the schema rows.
use std::sync::atomic::Ordering;

use acvp_api::{AlgorithmId, CryptoFailure, Error, ErrorKind, HandlerResult, TestCase};
use acvp_engine::schema::{FieldKind, FieldSpec, Presence, ROWS};
use acvp_engine::{CapabilityMetadata, CapabilityRegistry, SchemaRow, VectorSetProcessor};
use acvp_tests::{CountingHandler, FailingHandler, SilentHandler};
use serde_json::{json, Map, Value};

/// Every algorithm registered with a handler that produces nothing
fn silent_registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    for id in AlgorithmId::ALL {
        registry.register(id, SilentHandler, CapabilityMetadata::new("silent", "0")).unwrap();
    }
    registry
}

fn sample_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Hex => json!("00"),
        FieldKind::Str => json!("SHA2-256"),
        FieldKind::Choice(options) => json!(options[0]),
        FieldKind::Int => json!(8),
        FieldKind::Bool => json!(false),
        FieldKind::Records(nested) => json!([sample_object(nested)]),
    }
}

fn wrong_kind(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Hex | FieldKind::Str | FieldKind::Choice(_) => json!(5),
        FieldKind::Int => json!("8"),
        FieldKind::Bool => json!("true"),
        FieldKind::Records(_) => json!("records"),
    }
}

fn sample_object(specs: &[FieldSpec]) -> Map<String, Value> {
    specs.iter().map(|s| (s.name.to_owned(), sample_value(s.kind))).collect()
}

fn sample_request(algorithm: AlgorithmId, row: &SchemaRow) -> Value {
    let mut group = sample_object(row.group);
    group.insert("tgId".into(), json!(1));
    group.insert("testType".into(), json!(row.test_type.as_str()));
    let mut test = sample_object(row.test);
    test.insert("tcId".into(), json!(1));
    group.insert("tests".into(), json!([test]));

    let mut request = json!({ "vsId": 1, "algorithm": algorithm.algorithm(), "testGroups": [group] });
    if let Some(mode) = algorithm.mode() {
        request["mode"] = json!(mode);
    }
    request
}

fn required(spec: &FieldSpec) -> bool {
    !matches!(spec.presence, Presence::Optional)
}

/// Call `check` for every field of `row` with a closure removing it from a sample request
fn for_each_field(row: &SchemaRow, mut check: impl FnMut(&FieldSpec, &dyn Fn(&mut Value) -> Option<()>)) {
    for spec in row.group {
        check(spec, &|v: &mut Value| v["testGroups"][0].as_object_mut()?.remove(spec.name).map(drop));
    }
    for spec in row.test {
        check(spec, &|v: &mut Value| v["testGroups"][0]["tests"][0].as_object_mut()?.remove(spec.name).map(drop));
        if let FieldKind::Records(nested) = spec.kind {
            for inner in nested {
                check(inner, &|v: &mut Value| {
                    v["testGroups"][0]["tests"][0][spec.name][0].as_object_mut()?.remove(inner.name).map(drop)
                });
            }
        }
    }
}

fn process(registry: &CapabilityRegistry, request: &Value) -> Result<(), Error> {
    VectorSetProcessor::new(registry).process(request).map(drop)
}

#[test]
fn test_samples_reach_the_handler() {
    let registry = silent_registry();
    for row in ROWS.iter() {
        for &id in row.algorithms {
            let err = process(&registry, &sample_request(id, row)).unwrap_err();
            // the silent handler produced nothing, so ingestion and binding succeeded
            assert_eq!(err.kind(), ErrorKind::CryptoModuleFailure, "{} {}: {}", id, row.test_type, err);
        }
    }
}

#[test]
fn test_every_required_field_is_enforced() {
    let registry = silent_registry();
    for row in ROWS.iter() {
        let id = row.algorithms[0];
        for_each_field(row, |spec, remove| {
            let mut request = sample_request(id, row);
            remove(&mut request).expect("field present in sample");
            let result = process(&registry, &request);
            if required(spec) {
                match result {
                    Err(Error::MissingField { field, .. }) => assert_eq!(field, spec.name, "{}", id),
                    other => panic!("{} {} without {}: {:?}", id, row.test_type, spec.name, other),
                }
            } else {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::CryptoModuleFailure, "{} without {}", id, spec.name);
            }
        });
    }
}

#[test]
fn test_every_field_checks_its_json_kind() {
    let registry = silent_registry();
    for row in ROWS.iter() {
        let id = row.algorithms[0];
        for_each_field(row, |spec, remove| {
            let mut request = sample_request(id, row);
            remove(&mut request).expect("field present in sample");
            // put it back with the wrong kind, wherever it was
            let target = locate(&mut request, row, spec.name);
            target.insert(spec.name.to_owned(), wrong_kind(spec.kind));
            let err = process(&registry, &request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedRequest, "{} {}: {}", id, spec.name, err);
            assert_eq!(err.location().unwrap().field, Some(spec.name));
        });
    }
}

fn locate<'v>(request: &'v mut Value, row: &SchemaRow, name: &str) -> &'v mut Map<String, Value> {
    let group = &mut request["testGroups"][0];
    if row.group.iter().any(|s| s.name == name) {
        return group.as_object_mut().unwrap();
    }
    if row.test.iter().any(|s| s.name == name) {
        return group["tests"][0].as_object_mut().unwrap();
    }
    let records = row
        .test
        .iter()
        .find(|s| matches!(s.kind, FieldKind::Records(nested) if nested.iter().any(|n| n.name == name)))
        .unwrap();
    group["tests"][0][records.name][0].as_object_mut().unwrap()
}

#[test]
fn test_rnd_optional_only_when_deterministic() {
    let registry = silent_registry();
    let row = acvp_engine::schema::lookup(AlgorithmId::MlDsaSigGen, acvp_api::TestType::Aft).unwrap();
    let mut request = sample_request(AlgorithmId::MlDsaSigGen, row);
    request["testGroups"][0]["tests"][0].as_object_mut().unwrap().remove("rnd");

    let err = process(&registry, &request).unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "rnd", .. }), "{:?}", err);

    request["testGroups"][0]["deterministic"] = json!(true);
    let err = process(&registry, &request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CryptoModuleFailure);
}

fn sha256_request(groups: Value) -> Value {
    json!({ "vsId": 9, "algorithm": "SHA2-256", "testGroups": groups })
}

fn one_group(tests: Value) -> Value {
    sha256_request(json!([{ "tgId": 1, "testType": "AFT", "tests": tests }]))
}

#[test]
fn test_vector_set_level_errors() {
    let registry = silent_registry();
    let cases = [
        (json!([]), ErrorKind::MalformedRequest),
        (json!({ "testGroups": [] }), ErrorKind::MalformedRequest),
        (json!({ "algorithm": 256, "testGroups": [] }), ErrorKind::MalformedRequest),
        (json!({ "algorithm": "SHA-1", "testGroups": [] }), ErrorKind::InvalidRequest),
        (json!({ "algorithm": "ML-DSA", "testGroups": [] }), ErrorKind::MalformedRequest),
        (json!({ "algorithm": "ML-DSA", "mode": "keyVer", "testGroups": [] }), ErrorKind::InvalidRequest),
        (json!({ "algorithm": "SHA2-256", "mode": "keyGen", "testGroups": [] }), ErrorKind::InvalidRequest),
        (json!({ "algorithm": "SHA2-256" }), ErrorKind::MalformedRequest),
        (json!({ "vsId": "one", "algorithm": "SHA2-256", "testGroups": [] }), ErrorKind::MalformedRequest),
    ];
    for (request, kind) in cases {
        let err = process(&registry, &request).unwrap_err();
        assert_eq!(err.kind(), kind, "{} -> {}", request, err);
    }
}

#[test]
fn test_empty_test_groups_yield_an_empty_response() {
    let registry = silent_registry();
    let doc = VectorSetProcessor::new(&registry).process(&sha256_request(json!([]))).unwrap();
    assert!(doc.test_groups.is_empty());
}

#[test]
fn test_group_level_errors() {
    let registry = silent_registry();
    let test = json!({ "tcId": 1, "msg": "00", "len": 0 });
    let cases = [
        (json!([{ "testType": "AFT", "tests": [test] }]), ErrorKind::MissingField),
        (json!([{ "tgId": 0, "testType": "AFT", "tests": [test] }]), ErrorKind::MalformedRequest),
        (json!([{ "tgId": -1, "testType": "AFT", "tests": [test] }]), ErrorKind::MalformedRequest),
        (json!([{ "tgId": 1, "tests": [test] }]), ErrorKind::InvalidRequest),
        (json!([{ "tgId": 1, "testType": "MCT", "tests": [test] }]), ErrorKind::InvalidRequest),
        (json!([{ "tgId": 1, "testType": "AFT", "tests": [] }]), ErrorKind::MissingField),
        (json!([{ "tgId": 1, "testType": "AFT" }]), ErrorKind::MissingField),
        (json!([{ "tgId": 1, "testType": "AFT", "tests": [{ "msg": "00", "len": 0 }] }]), ErrorKind::MissingField),
        (json!(["group"]), ErrorKind::MalformedRequest),
    ];
    for (groups, kind) in cases {
        let err = process(&registry, &sha256_request(groups.clone())).unwrap_err();
        assert_eq!(err.kind(), kind, "{} -> {}", groups, err);
    }
}

#[test]
fn test_hex_errors_are_malformed() {
    let registry = silent_registry();
    let oversized = "00".repeat(8193);
    for msg in ["0", "0G", " 00", oversized.as_str()] {
        let err = process(&registry, &one_group(json!([{ "tcId": 7, "msg": msg, "len": 0 }]))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRequest, "{:.16}", msg);
        let at = err.location().unwrap();
        assert_eq!((at.tg_id, at.tc_id, at.field), (Some(1), Some(7), Some("msg")));
    }
}

#[test]
fn test_unknown_choice_is_invalid() {
    let registry = silent_registry();
    let request = json!({
        "algorithm": "ML-DSA", "mode": "keyGen",
        "testGroups": [{ "tgId": 1, "testType": "AFT", "parameterSet": "ML-DSA-99", "tests": [{ "tcId": 1, "seed": "00" }] }]
    });
    let err = process(&registry, &request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(err.location().unwrap().field, Some("parameterSet"));
}

#[test]
fn test_unknown_fields_are_ignored() {
    let mut registry = CapabilityRegistry::new();
    registry
        .register(
            AlgorithmId::Sha2_256,
            |case: &mut TestCase| -> HandlerResult {
                let hash = case.hash_mut().ok_or_else(|| CryptoFailure::new("not a hash case"))?;
                hash.md.write(&[0xAB])?;
                Ok(())
            },
            CapabilityMetadata::new("fixed", "0"),
        )
        .unwrap();
    let mut request = one_group(json!([{ "tcId": 1, "msg": "00", "len": 0, "comment": "x" }]));
    request["isSample"] = json!(true);
    request["testGroups"][0]["extra"] = json!({ "nested": [1, 2] });
    let doc = VectorSetProcessor::new(&registry).process(&request).unwrap();
    assert_eq!(doc.to_value().unwrap()["testGroups"][0]["tests"], json!([{ "tcId": 1, "md": "AB" }]));
}

fn md_handler(case: &mut TestCase) -> HandlerResult {
    let hash = case.hash_mut().ok_or_else(|| CryptoFailure::new("not a hash case"))?;
    hash.md.write(&hash.len.to_be_bytes())?;
    Ok(())
}

#[test]
fn test_failure_aborts_the_whole_vector_set() {
    let counting = CountingHandler::new(FailingHandler::new(md_handler, 3));
    let calls = counting.counter();
    let mut registry = CapabilityRegistry::new();
    registry
        .register(AlgorithmId::Sha2_256, counting, CapabilityMetadata::new("failing", "0"))
        .unwrap();

    let test = |tc_id: u64| json!({ "tcId": tc_id, "msg": "00", "len": 0 });
    let request = sha256_request(json!([
        { "tgId": 1, "testType": "AFT", "tests": [test(1), test(2)] },
        { "tgId": 2, "testType": "AFT", "tests": [test(3), test(4)] },
        { "tgId": 3, "testType": "AFT", "tests": [test(5)] }
    ]));

    let err = process(&registry, &request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CryptoModuleFailure);
    let at = err.location().unwrap();
    assert_eq!((at.tg_id, at.tc_id), (Some(2), Some(3)));
    assert!(err.to_string().contains("injected failure"));
    // nothing after the failing case was dispatched
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_malformed_case_stops_before_dispatch() {
    let counting = CountingHandler::new(md_handler);
    let calls = counting.counter();
    let mut registry = CapabilityRegistry::new();
    registry
        .register(AlgorithmId::Sha2_256, counting, CapabilityMetadata::new("counting", "0"))
        .unwrap();

    let request = one_group(json!([
        { "tcId": 1, "msg": "00", "len": 0 },
        { "tcId": 2, "msg": "XY", "len": 0 },
        { "tcId": 3, "msg": "00", "len": 0 }
    ]));
    let err = process(&registry, &request).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedRequest);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
