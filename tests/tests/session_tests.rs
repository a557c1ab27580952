// tests/session_tests.rs
use std::io::Write;

use acvp_api::ErrorKind;
use acvp_engine::{
    loader, CancelFlag, CapabilityRegistry, EngineConfig, FailurePolicy, Session, SessionController, SessionIdentity,
    SessionState, VectorSetStatus,
};
use acvp_tests::{init_tracing, load_prompt};
use serde_json::{json, Value};

fn fetching_session(id: u64, suites: &[&str]) -> Session {
    let mut session = Session::new(id);
    session.transition(SessionState::Registered).unwrap();
    session.transition(SessionState::Fetching).unwrap();
    for suite in suites {
        let document = load_prompt(suite).unwrap_or_else(|e| panic!("failed to load {}: {}", suite, e));
        session.add_vector_set(format!("/acvp/v1/testSessions/{}/vectorSets/{}", id, suite), document).unwrap();
    }
    session
}

fn config(policy: FailurePolicy, workers: usize) -> EngineConfig {
    EngineConfig { failure_policy: policy, workers, ..EngineConfig::default() }
}

fn statuses(report: &acvp_engine::SessionReport) -> Vec<&'static str> {
    report
        .outcomes
        .iter()
        .map(|o| match o.status {
            VectorSetStatus::Completed(_) => "completed",
            VectorSetStatus::Failed(_) => "failed",
            VectorSetStatus::Skipped => "skipped",
        })
        .collect()
}

/// Digests and DRBGs only, so ML-DSA vector sets fail as unsupported
fn registry_without_ml_dsa() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    acvp_iut::hash::register(&mut registry).unwrap();
    acvp_iut::drbg::register(&mut registry).unwrap();
    registry
}

#[test]
fn test_continue_policy_processes_everything() {
    init_tracing();
    let registry = registry_without_ml_dsa();
    for workers in [1, 4] {
        let cfg = config(FailurePolicy::Continue, workers);
        let controller = SessionController::new(&registry, &cfg);
        let mut session = fetching_session(11, &["SHA2-256", "ML-DSA-keyGen", "hmacDRBG", "SHA3-384"]);

        let report = controller.process_pending(&mut session, &CancelFlag::new()).unwrap();
        assert_eq!(statuses(&report), ["completed", "failed", "completed", "completed"], "workers={}", workers);
        assert!(!report.cancelled && !report.aborted);
        assert_eq!(session.state(), SessionState::Uploading);
        assert!(session.pending().is_empty());

        let (url, err) = report.failed().next().unwrap();
        assert!(url.ends_with("ML-DSA-keyGen"));
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);

        let algorithms: Vec<&str> = report.completed().map(|(_, doc)| doc.algorithm.as_str()).collect();
        assert_eq!(algorithms, ["SHA2-256", "hmacDRBG", "SHA3-384"]);

        controller.complete_upload(&mut session).unwrap();
        assert_eq!(session.state(), SessionState::Complete);
    }
}

#[test]
fn test_abort_policy_cancels_the_session() {
    let registry = registry_without_ml_dsa();
    let cfg = config(FailurePolicy::AbortSession, 1);
    let controller = SessionController::new(&registry, &cfg);
    let mut session = fetching_session(12, &["SHA2-256", "ML-DSA-keyGen", "hmacDRBG"]);

    let report = controller.process_pending(&mut session, &CancelFlag::new()).unwrap();
    assert_eq!(statuses(&report), ["completed", "failed", "skipped"]);
    assert!(report.aborted);
    assert!(!report.cancelled);
    assert_eq!(report.skipped(), 1);
    assert_eq!(session.state(), SessionState::Cancelled);
    assert!(controller.complete_upload(&mut session).is_err());
}

#[test]
fn test_cancellation_before_processing() {
    let registry = acvp_iut::registry().unwrap();
    let cfg = config(FailurePolicy::Continue, 2);
    let controller = SessionController::new(registry, &cfg);
    let mut session = fetching_session(13, &["SHA2-256", "SHA3-384"]);

    let cancel = CancelFlag::new();
    cancel.clone().cancel();
    let report = controller.process_pending(&mut session, &cancel).unwrap();
    assert_eq!(statuses(&report), ["skipped", "skipped"]);
    assert!(report.cancelled);
    assert_eq!(session.state(), SessionState::Cancelled);
}

#[test]
fn test_vector_sets_only_accepted_while_fetching() {
    let mut session = Session::new(14);
    assert!(session.add_vector_set("vs/1", Value::Null).is_err());
    session.transition(SessionState::Registered).unwrap();
    assert!(session.add_vector_set("vs/1", Value::Null).is_err());
    session.transition(SessionState::Fetching).unwrap();
    session.add_vector_set("vs/1", Value::Null).unwrap();
    assert_eq!(session.pending().len(), 1);
}

#[test]
fn test_resume_from_persisted_identity() {
    let registry = acvp_iut::registry().unwrap();
    let cfg = EngineConfig::default();
    let controller = SessionController::new(registry, &cfg);

    let session = fetching_session(15, &["SHA2-256", "hmacDRBG"]);
    let identity = session.identity();
    assert_eq!(identity.vector_set_urls.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    identity.save(&path).unwrap();
    drop(session);

    let restored = SessionIdentity::load(&path).unwrap();
    assert_eq!(restored, identity);
    let mut resumed = Session::resume(restored);
    assert_eq!(resumed.state(), SessionState::Resumed);
    assert_eq!(resumed.id(), 15);
    for url in &identity.vector_set_urls {
        let suite = url.rsplit('/').next().unwrap();
        resumed.add_vector_set(url.clone(), load_prompt(suite).unwrap()).unwrap();
    }
    // re-adding a known url does not duplicate it in the identity
    assert_eq!(resumed.identity(), identity);

    let report = controller.process_pending(&mut resumed, &CancelFlag::new()).unwrap();
    assert_eq!(report.completed().count(), 2);
    assert_eq!(resumed.state(), SessionState::Uploading);
}

#[test]
fn test_config_file_drives_rendering() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "acv_version = \"1.0\"\npretty_responses = true\nworkers = 2").unwrap();
    let cfg = EngineConfig::load(file.path()).unwrap();
    assert!(cfg.pretty_responses);
    assert_eq!(cfg.failure_policy, FailurePolicy::Continue);

    let registry = acvp_iut::registry().unwrap();
    let controller = SessionController::new(registry, &cfg);
    let mut session = fetching_session(16, &["SHA2-256"]);
    let report = controller.process_pending(&mut session, &CancelFlag::new()).unwrap();
    let (_, doc) = report.completed().next().unwrap();

    let rendered = controller.render(doc).unwrap();
    assert!(rendered.contains('\n'));
    let envelope: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(envelope[0], json!({ "acvVersion": "1.0" }));
    assert_eq!(loader::load_str(&rendered).unwrap(), doc.to_value().unwrap());
}

#[test]
fn test_bad_config_is_rejected() {
    assert!(EngineConfig::from_toml_str("workers = 0").is_err());
    assert!(EngineConfig::from_toml_str("failure_policy = \"retry\"").is_err());
    assert!(EngineConfig::from_toml_str("threads = 2").is_err());
    assert!(EngineConfig::load("/nonexistent/acvp.toml").is_err());
}

#[test]
fn test_registration_lists_shipped_capabilities() {
    let registry = acvp_iut::registry().unwrap();
    let caps = registry.registration();
    let caps = caps.as_array().unwrap();
    assert_eq!(caps.len(), registry.len());
    assert_eq!(caps[0], json!({ "algorithm": "SHA2-224", "revision": "1.0" }));
    assert!(caps.contains(&json!({ "algorithm": "SHA3-256", "revision": "2.0" })));
    assert!(caps.contains(&json!({ "algorithm": "hmacDRBG", "revision": "1.0" })));
    assert!(caps.contains(&json!({ "algorithm": "ctrDRBG", "revision": "1.0" })));
    for mode in ["keyGen", "sigGen", "sigVer"] {
        assert!(caps.contains(&json!({ "algorithm": "ML-DSA", "mode": mode, "revision": "FIPS204" })), "{}", mode);
    }
    assert_eq!(caps.iter().filter(|c| c.get("mode").is_some()).count(), 3);
}

#[test]
fn test_shipped_registry_completes_a_mixed_session() {
    let registry = acvp_iut::registry().unwrap();
    let cfg = config(FailurePolicy::AbortSession, 2);
    let controller = SessionController::new(registry, &cfg);
    let mut session = fetching_session(17, &["SHA2-256", "ML-DSA-keyGen", "hashDRBG", "ML-DSA-sigVer"]);

    let report = controller.process_pending(&mut session, &CancelFlag::new()).unwrap();
    assert_eq!(statuses(&report), ["completed"; 4]);
    assert!(!report.aborted);
    controller.complete_upload(&mut session).unwrap();
    assert_eq!(session.state(), SessionState::Complete);
}
