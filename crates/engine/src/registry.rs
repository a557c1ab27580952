//! Capability registry: algorithm identifiers to handlers

use std::collections::HashMap;
use std::fmt;

use acvp_api::{AlgorithmId, CapabilityHandler};
use serde_json::{Map, Value};
use thiserror::Error;

/// Registry construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a handler for {algorithm} is already registered")]
    Duplicate { algorithm: AlgorithmId },
}

/// Descriptive data carried alongside a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityMetadata {
    /// Human-readable description
    pub description: String,
    /// Protocol revision advertised at registration, e.g. `FIPS204`
    pub revision: String,
}

impl CapabilityMetadata {
    pub fn new(description: impl Into<String>, revision: impl Into<String>) -> Self {
        Self { description: description.into(), revision: revision.into() }
    }
}

/// One registered capability
pub struct CapabilityEntry {
    algorithm: AlgorithmId,
    handler: Box<dyn CapabilityHandler>,
    metadata: CapabilityMetadata,
}

impl CapabilityEntry {
    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    pub fn handler(&self) -> &dyn CapabilityHandler {
        self.handler.as_ref()
    }

    pub fn metadata(&self) -> &CapabilityMetadata {
        &self.metadata
    }
}

impl fmt::Debug for CapabilityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityEntry")
            .field("algorithm", &self.algorithm)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Table of handlers keyed by [`AlgorithmId`]
///
/// Built once at startup and read-only afterwards; shared across workers
/// by reference.
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    entries: Vec<CapabilityEntry>,
    index: HashMap<AlgorithmId, usize>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; each algorithm may be registered once
    pub fn register<H>(
        &mut self,
        algorithm: AlgorithmId,
        handler: H,
        metadata: CapabilityMetadata,
    ) -> Result<(), RegistryError>
    where
        H: CapabilityHandler + 'static,
    {
        if self.index.contains_key(&algorithm) {
            return Err(RegistryError::Duplicate { algorithm });
        }
        self.index.insert(algorithm, self.entries.len());
        self.entries.push(CapabilityEntry { algorithm, handler: Box::new(handler), metadata });
        Ok(())
    }

    pub fn lookup(&self, algorithm: AlgorithmId) -> Option<&CapabilityEntry> {
        self.index.get(&algorithm).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, algorithm: AlgorithmId) -> bool {
        self.index.contains_key(&algorithm)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityEntry> {
        self.entries.iter()
    }

    /// Capability list for the registration request, in registration order
    pub fn registration(&self) -> Value {
        let caps: Vec<Value> = self
            .entries
            .iter()
            .map(|e| {
                let mut cap = Map::new();
                cap.insert("algorithm".into(), Value::from(e.algorithm.algorithm()));
                if let Some(mode) = e.algorithm.mode() {
                    cap.insert("mode".into(), Value::from(mode));
                }
                cap.insert("revision".into(), Value::from(e.metadata.revision.as_str()));
                Value::Object(cap)
            })
            .collect();
        Value::Array(caps)
    }
}
