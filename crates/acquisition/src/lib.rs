//! Acquisition Orchestrator
//!
//! Runs one best-effort refresh cycle against the Pi-hole: read the cached
//! baseline, log in, fetch, cache the new sample, and fall back to the
//! cache (or the zero-state) on any failure. No retries within a cycle.

mod orchestrator;

pub use orchestrator::{RefreshOrchestrator, RefreshOutcome, SampleSource};

use pihole_api::{AuthError, FetchError};
use thiserror::Error;

/// Why a cycle fell back to cached data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("No admin password stored")]
    CredentialMissing,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
