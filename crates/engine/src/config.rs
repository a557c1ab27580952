//! Engine configuration
//!
//! Loaded from TOML, passed by reference to whoever needs it:
//!
//! ```toml
//! failure_policy = "abort_session"
//! workers = 4
//! acv_version = "1.0"
//! pretty_responses = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the session does after a vector set fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and process the remaining vector sets
    #[default]
    Continue,
    /// Stop starting new vector sets and cancel the session
    AbortSession,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub failure_policy: FailurePolicy,
    /// Vector sets processed concurrently; at least 1
    pub workers: usize,
    /// Protocol version written into response envelopes
    pub acv_version: String,
    /// Pretty-print rendered responses
    pub pretty_responses: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Continue,
            workers: 1,
            acv_version: "1.0".to_owned(),
            pretty_responses: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        if self.acv_version.is_empty() {
            return Err(ConfigError::Invalid("acv_version must not be empty".into()));
        }
        Ok(())
    }
}
