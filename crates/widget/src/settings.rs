//! Widget settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `PIHOLE_WIDGET_*` environment variables (`__` separates
//! nested keys, e.g. `PIHOLE_WIDGET_EVALUATOR__MIN_QUERY_DELTA=20`).

use crate::render::Locale;
use config::{Config, ConfigError, Environment, File};
use pihole_api::ApiConfig;
use serde::{Deserialize, Serialize};
use status_evaluator::EvaluatorConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "pihole-widget.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PIHOLE_WIDGET";

/// Upper bound of `refresh_hours` (one week)
pub const MAX_REFRESH_HOURS: u64 = 168;

/// Per-user state directory; relative only when no home can be found
pub fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("pihole-widget"))
        .unwrap_or_else(|| PathBuf::from(".pihole-widget"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pi-hole base URL; prefer the IP over a host name
    pub base_url: String,
    pub auth_path: String,
    pub stats_path: String,
    pub login_timeout_secs: u64,
    pub stats_timeout_secs: u64,
    /// Hours until the next suggested refresh
    pub refresh_hours: u64,
    /// Directory holding the password and the cached sample
    pub state_dir: PathBuf,
    pub password_key: String,
    pub cache_key: String,
    pub locale: Locale,
    /// Bind address of `serve`
    pub listen_addr: String,
    pub evaluator: EvaluatorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            base_url: api.base_url,
            auth_path: api.auth_path,
            stats_path: api.stats_path,
            login_timeout_secs: api.login_timeout.as_secs(),
            stats_timeout_secs: api.stats_timeout.as_secs(),
            refresh_hours: 6,
            state_dir: default_state_dir(),
            password_key: "pihole_admin_password_v1".to_string(),
            cache_key: "pihole_widget_cache_v6_enhanced_v1".to_string(),
            locale: Locale::default(),
            listen_addr: "127.0.0.1:8080".to_string(),
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings; an explicitly given file must exist
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (file, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        Config::builder()
            .add_source(File::from(file).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values that cannot be scheduled or rendered
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_REFRESH_HOURS).contains(&self.refresh_hours) {
            return Err(ConfigError::Message(format!(
                "refresh_hours must be between 1 and {}, got {}",
                MAX_REFRESH_HOURS, self.refresh_hours
            )));
        }
        Ok(())
    }

    /// Connection settings for the API client
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            auth_path: self.auth_path.clone(),
            stats_path: self.stats_path.clone(),
            login_timeout: Duration::from_secs(self.login_timeout_secs),
            stats_timeout: Duration::from_secs(self.stats_timeout_secs),
        }
    }

    /// Interval between periodic refreshes
    pub fn refresh_interval(&self) -> Duration {
        let hours = self.refresh_hours.clamp(1, MAX_REFRESH_HOURS);
        Duration::from_secs(hours * 3600)
    }
}
