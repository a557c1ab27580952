//! Loads vector-set documents, unwrapping the protocol envelope

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed envelope: {0}")]
    Envelope(&'static str),
}

/// Strip `[{"acvVersion": ..}, body]` framing; bare objects pass through
pub fn unwrap_envelope(value: Value) -> Result<Value, LoadError> {
    match value {
        Value::Array(items) => {
            let mut items = items.into_iter();
            match (items.next(), items.next(), items.next()) {
                (Some(Value::Object(header)), Some(body @ Value::Object(_)), None) => {
                    if header.get("acvVersion").map_or(false, Value::is_string) {
                        Ok(body)
                    } else {
                        Err(LoadError::Envelope("first element lacks acvVersion"))
                    }
                }
                _ => Err(LoadError::Envelope("expected [version header, body]")),
            }
        }
        other => Ok(other),
    }
}

pub fn load_str(s: &str) -> Result<Value, LoadError> {
    unwrap_envelope(serde_json::from_str(s)?)
}

pub fn load_reader<R: Read>(reader: R) -> Result<Value, LoadError> {
    unwrap_envelope(serde_json::from_reader(reader)?)
}

pub fn load_path(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    load_str(&text)
}
