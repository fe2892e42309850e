//! Evaluator thresholds

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid threshold combination
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive, finite number of minutes (got {value})")]
    InvalidMinutes { field: &'static str, value: f64 },
}

/// Thresholds used by the status rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Cached data at least this old (minutes) counts as offline
    pub error_stale_minutes: f64,
    /// At most this many clients is a warning
    pub clients_warn_max: u64,
    /// Minimum clients before the query trend is checked
    pub delta_min_clients: u64,
    /// Previous sample must be at most this old (minutes) for the trend check
    pub delta_window_minutes: f64,
    /// Fewer new queries than this within the window is a warning
    pub min_query_delta: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            error_stale_minutes: 120.0,
            clients_warn_max: 1,
            delta_min_clients: 2,
            delta_window_minutes: 30.0,
            min_query_delta: 10,
        }
    }
}

impl EvaluatorConfig {
    /// Check that the minute thresholds are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("error_stale_minutes", self.error_stale_minutes),
            ("delta_window_minutes", self.delta_window_minutes),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidMinutes { field, value });
            }
        }
        Ok(())
    }
}
