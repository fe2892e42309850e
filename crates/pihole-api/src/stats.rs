//! Statistics Retrieval

use crate::auth::Session;
use crate::client::ApiClient;
use crate::error::{excerpt, FetchError};
use crate::sample::Sample;
use crate::SESSION_HEADER;
use chrono::Utc;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// Retrieves and normalizes a statistics snapshot
pub trait StatsFetcher {
    /// Perform one stats request with the given session. No retries.
    fn fetch(&self, session: &Session) -> impl Future<Output = Result<Sample, FetchError>> + Send;
}

impl StatsFetcher for ApiClient {
    async fn fetch(&self, session: &Session) -> Result<Sample, FetchError> {
        let url = self.config.stats_url();
        debug!("Fetching stats from {}", url);

        let request = self.http.get(&url).header(SESSION_HEADER, session.token());
        let (status, text) = self
            .send(request, self.config.stats_timeout)
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!("Stats request failed with HTTP {}", status.as_u16());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: excerpt(&text),
            });
        }

        let document = parse_document(&text).ok_or_else(|| FetchError::Malformed {
            status: status.as_u16(),
            body: excerpt(&text),
        })?;

        Ok(Sample::from_stats(&document, Utc::now()))
    }
}

/// Parse a stats body, accepting only JSON objects
fn parse_document(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}
