//! HTTP Client for the Pi-hole Management API

use reqwest::header::ACCEPT;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for login and stats requests
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the management API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host, e.g. "http://192.168.178.10" (an IP avoids DNS trouble)
    pub base_url: String,
    /// Path of the session endpoint
    pub auth_path: String,
    /// Path of the statistics summary endpoint
    pub stats_path: String,
    /// Timeout for the login request
    pub login_timeout: Duration,
    /// Timeout for the stats request
    pub stats_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://pi.hole".to_string(),
            auth_path: "/api/auth".to_string(),
            stats_path: "/api/stats/summary".to_string(),
            login_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            stats_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Full URL of the session endpoint
    pub fn auth_url(&self) -> String {
        join(&self.base_url, &self.auth_path)
    }

    /// Full URL of the statistics endpoint
    pub fn stats_url(&self) -> String {
        join(&self.base_url, &self.stats_path)
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Client for the management API
///
/// Implements both [`crate::Authenticator`] and [`crate::StatsFetcher`].
/// Every call is a single attempt bounded by its own timeout.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) config: ApiConfig,
    pub(crate) http: reqwest::Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        info!("Creating Pi-hole API client for {}", config.base_url);
        let http = reqwest::Client::builder()
            .user_agent(concat!("pihole-widget/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }

    /// Send a request and read the whole body as text
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<(StatusCode, String), reqwest::Error> {
        let response = request
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("HTTP {} ({} bytes)", status.as_u16(), text.len());
        Ok((status, text))
    }
}
