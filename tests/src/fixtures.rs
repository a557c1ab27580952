//! Vector fixtures and log capture

use std::path::{Path, PathBuf};

use acvp_engine::{loader, LoadError};
use once_cell::sync::Lazy;
use serde_json::Value;

/// Directory holding one sub-directory of JSON files per suite
pub fn vectors_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("vectors")
        .join("acvp_json")
}

/// The server prompt of a suite, with its envelope stripped
pub fn load_prompt(suite: &str) -> Result<Value, LoadError> {
    loader::load_path(vectors_dir().join(suite).join("prompt.json"))
}

/// The expected response body of a suite, with its envelope stripped
pub fn load_expected(suite: &str) -> Result<Value, LoadError> {
    loader::load_path(vectors_dir().join(suite).join("expectedResults.json"))
}

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
});

/// Route engine logs to the test harness's captured output
pub fn init_tracing() {
    Lazy::force(&TRACING);
}
