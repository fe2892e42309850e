//! Refresh Cycle Implementation

use crate::RefreshError;
use chrono::Utc;
use pihole_api::{Authenticator, Sample, StatsFetcher};
use sample_store::{CredentialVault, SampleStore, SecretStore};
use status_evaluator::{StatusEvaluator, StatusResult};
use tracing::{debug, info, warn};

/// Where the sample of a cycle came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSource {
    /// Fetched in this cycle
    Live,
    /// Last known good sample
    Cache,
    /// Nothing available; zero-state
    Empty,
}

impl SampleSource {
    /// Lowercase label, also used as metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleSource::Live => "live",
            SampleSource::Cache => "cache",
            SampleSource::Empty => "empty",
        }
    }
}

/// Result of one refresh cycle
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub sample: Sample,
    pub is_live: bool,
    pub status: StatusResult,
    pub source: SampleSource,
    /// Cause of the fallback, for interactive notices
    pub failure: Option<RefreshError>,
}

/// Sequences login, fetch, caching and evaluation
///
/// Cycles must not overlap on the same store; callers that can trigger
/// concurrently serialize access themselves.
pub struct RefreshOrchestrator<C, S> {
    api: C,
    vault: CredentialVault<S>,
    cache: SampleStore<S>,
    evaluator: StatusEvaluator,
}

impl<C, S> RefreshOrchestrator<C, S>
where
    C: Authenticator + StatsFetcher,
    S: SecretStore,
{
    /// Create a new orchestrator
    pub fn new(
        api: C,
        vault: CredentialVault<S>,
        cache: SampleStore<S>,
        evaluator: StatusEvaluator,
    ) -> Self {
        Self {
            api,
            vault,
            cache,
            evaluator,
        }
    }

    /// Cached sample access, for maintenance actions
    pub fn cache(&self) -> &SampleStore<S> {
        &self.cache
    }

    /// Password access, for maintenance actions
    pub fn vault(&self) -> &CredentialVault<S> {
        &self.vault
    }

    /// Run one refresh cycle
    pub async fn refresh(&self) -> RefreshOutcome {
        info!("Starting refresh cycle");

        // Baseline for the trend check, read before any write
        let previous = self.cache.load();

        let (sample, source, failure) = match self.acquire().await {
            Ok(sample) => {
                self.cache.save(&sample);
                (sample, SampleSource::Live, None)
            }
            Err(e) => {
                warn!("Refresh failed, using last known values: {}", e);
                match previous.clone() {
                    Some(cached) => (cached, SampleSource::Cache, Some(e)),
                    None => (Sample::zero_state(), SampleSource::Empty, Some(e)),
                }
            }
        };

        let is_live = source == SampleSource::Live;
        let status = self
            .evaluator
            .evaluate(&sample, is_live, previous.as_ref(), Utc::now());

        metrics::counter!("pihole_refresh_total", "outcome" => source.as_str()).increment(1);
        metrics::counter!("pihole_status_total", "level" => status.level.as_str()).increment(1);
        info!(
            "Refresh cycle finished: source={}, status={}, reason={}",
            source.as_str(),
            status.level,
            status.reason_code().unwrap_or("-")
        );

        RefreshOutcome {
            sample,
            is_live,
            status,
            source,
            failure,
        }
    }

    /// Credential, login and fetch; the first failure ends the attempt
    async fn acquire(&self) -> Result<Sample, RefreshError> {
        let credential = self
            .vault
            .credential()
            .ok_or(RefreshError::CredentialMissing)?;

        let session = self.api.authenticate(&credential).await?;
        debug!("Session established");

        let sample = self.api.fetch(&session).await?;
        debug!("Fetched {} queries", sample.total_queries);
        Ok(sample)
    }
}
