//! Session state machine and the controller that drives the processor
//!
//! ```text
//! New -> Registered -> Fetching -> Processing -> Uploading -> Complete
//!   \________________________\______/   ^
//!        (persisted identity) Resumed --+
//!
//! any non-terminal state -> Cancelled
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use acvp_api::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::{EngineConfig, FailurePolicy};
use crate::processor::VectorSetProcessor;
use crate::registry::CapabilityRegistry;
use crate::response::ResponseDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    New,
    Registered,
    Fetching,
    Processing,
    Uploading,
    Complete,
    /// Re-entered from a persisted identity; continues with Processing
    Resumed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }

    /// Whether `self -> to` is a legal transition
    pub fn can_transition(self, to: SessionState) -> bool {
        use SessionState::*;
        match (self, to) {
            (New, Registered)
            | (Registered, Fetching)
            | (Fetching, Processing)
            | (Processing, Uploading)
            | (Uploading, Complete)
            | (Resumed, Processing) => true,
            (New | Registered | Fetching | Processing | Uploading, Resumed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("illegal session transition {from} -> {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("session in state {state} does not accept vector sets")]
    NotAccepting { state: SessionState },

    #[error("session identity I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("session identity is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// What survives a process restart: enough to resume a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub session_id: u64,
    pub vector_set_urls: Vec<String>,
}

impl SessionIdentity {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }
}

/// A fetched vector set awaiting processing
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVectorSet {
    pub url: String,
    pub document: Value,
}

#[derive(Debug)]
pub struct Session {
    id: u64,
    state: SessionState,
    vector_set_urls: Vec<String>,
    pending: Vec<PendingVectorSet>,
}

impl Session {
    pub fn new(id: u64) -> Self {
        Self { id, state: SessionState::New, vector_set_urls: Vec::new(), pending: Vec::new() }
    }

    /// Rebuild a session from its persisted identity, in state `Resumed`
    ///
    /// The vector sets themselves must be fetched again and added.
    pub fn resume(identity: SessionIdentity) -> Self {
        Self {
            id: identity.session_id,
            state: SessionState::Resumed,
            vector_set_urls: identity.vector_set_urls,
            pending: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn pending(&self) -> &[PendingVectorSet] {
        &self.pending
    }

    pub fn transition(&mut self, to: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition(to) {
            return Err(SessionError::InvalidTransition { from: self.state, to });
        }
        debug!(session = self.id, from = %self.state, %to, "session transition");
        self.state = to;
        Ok(())
    }

    /// Queue a fetched vector set; only while fetching or resumed
    pub fn add_vector_set(&mut self, url: impl Into<String>, document: Value) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Fetching | SessionState::Resumed) {
            return Err(SessionError::NotAccepting { state: self.state });
        }
        let url = url.into();
        if !self.vector_set_urls.contains(&url) {
            self.vector_set_urls.push(url.clone());
        }
        self.pending.push(PendingVectorSet { url, document });
        Ok(())
    }

    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity { session_id: self.id, vector_set_urls: self.vector_set_urls.clone() }
    }
}

/// Cooperative cancellation, checked between vector sets
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VectorSetStatus {
    Completed(ResponseDocument),
    Failed(Error),
    /// Not started: cancelled, or the session was aborted by policy
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorSetOutcome {
    pub url: String,
    pub status: VectorSetStatus,
}

/// Per-vector-set outcomes, in submission order
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub outcomes: Vec<VectorSetOutcome>,
    pub cancelled: bool,
    /// Set when `AbortSession` stopped the session after a failure
    pub aborted: bool,
}

impl SessionReport {
    pub fn completed(&self) -> impl Iterator<Item = (&str, &ResponseDocument)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            VectorSetStatus::Completed(doc) => Some((o.url.as_str(), doc)),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            VectorSetStatus::Failed(e) => Some((o.url.as_str(), e)),
            _ => None,
        })
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status == VectorSetStatus::Skipped).count()
    }
}

/// Runs a session's pending vector sets through the processor
#[derive(Debug, Clone, Copy)]
pub struct SessionController<'a> {
    registry: &'a CapabilityRegistry,
    config: &'a EngineConfig,
}

impl<'a> SessionController<'a> {
    pub fn new(registry: &'a CapabilityRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Process every pending vector set
    ///
    /// Moves the session to `Processing`, then to `Uploading` when all
    /// vector sets were attempted, or to `Cancelled` when cancellation was
    /// requested or the failure policy aborted the session. Vector sets run
    /// on up to `workers` threads; each owns its buffers.
    pub fn process_pending(
        &self,
        session: &mut Session,
        cancel: &CancelFlag,
    ) -> Result<SessionReport, SessionError> {
        session.transition(SessionState::Processing)?;
        let pending = std::mem::take(&mut session.pending);
        let workers = self.config.workers.clamp(1, pending.len().max(1));
        info!(session = session.id, vector_sets = pending.len(), workers, "processing session");

        let next = AtomicUsize::new(0);
        let aborted = AtomicBool::new(false);
        let slots: Mutex<Vec<Option<VectorSetStatus>>> = Mutex::new(vec![None; pending.len()]);
        let processor = VectorSetProcessor::new(self.registry);

        thread::scope(|s| {
            for _ in 0..workers {
                s.spawn(|| loop {
                    if cancel.is_cancelled() || aborted.load(Ordering::SeqCst) {
                        break;
                    }
                    let i = next.fetch_add(1, Ordering::SeqCst);
                    let Some(vs) = pending.get(i) else { break };

                    let status = match processor.process(&vs.document) {
                        Ok(doc) => VectorSetStatus::Completed(doc),
                        Err(e) => {
                            match self.config.failure_policy {
                                FailurePolicy::Continue => {
                                    warn!(url = %vs.url, "vector set failed, continuing: {}", e)
                                }
                                FailurePolicy::AbortSession => {
                                    error!(url = %vs.url, "vector set failed, aborting session: {}", e);
                                    aborted.store(true, Ordering::SeqCst);
                                }
                            }
                            VectorSetStatus::Failed(e)
                        }
                    };
                    let mut slots = slots.lock().unwrap_or_else(|p| p.into_inner());
                    slots[i] = Some(status);
                });
            }
        });

        let slots = slots.into_inner().unwrap_or_else(|p| p.into_inner());
        let outcomes = pending
            .into_iter()
            .zip(slots)
            .map(|(vs, slot)| VectorSetOutcome {
                url: vs.url,
                status: slot.unwrap_or(VectorSetStatus::Skipped),
            })
            .collect();

        let report = SessionReport {
            outcomes,
            cancelled: cancel.is_cancelled(),
            aborted: aborted.load(Ordering::SeqCst),
        };
        if report.cancelled || report.aborted {
            session.transition(SessionState::Cancelled)?;
        } else {
            session.transition(SessionState::Uploading)?;
        }
        info!(
            session = session.id,
            completed = report.completed().count(),
            failed = report.failed().count(),
            skipped = report.skipped(),
            state = %session.state,
            "session processing finished"
        );
        Ok(report)
    }

    /// Record that the transport uploaded every response
    pub fn complete_upload(&self, session: &mut Session) -> Result<(), SessionError> {
        session.transition(SessionState::Complete)
    }

    /// Render a response the way the configuration asks for
    pub fn render(&self, doc: &ResponseDocument) -> serde_json::Result<String> {
        let envelope = doc.to_envelope(&self.config.acv_version)?;
        if self.config.pretty_responses {
            serde_json::to_string_pretty(&envelope)
        } else {
            serde_json::to_string(&envelope)
        }
    }
}
