//! Status classification results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Health level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusLevel {
    Ok,
    Warning,
    Error,
}

impl StatusLevel {
    /// Lowercase label, also used as metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLevel::Ok => "ok",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        }
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-readable reason with its substitution parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", content = "params", rename_all = "kebab-case")]
pub enum StatusReason {
    /// No data, or cached data past the offline threshold
    Offline,
    /// Fetch failed; showing cached data of the given age
    StaleCache { age_minutes: u64 },
    /// Live data reports no queries at all
    NoQueryActivity,
    /// Live data reports at most the warning number of clients
    TooFewClients { clients: u64 },
    /// Query count barely moved since the previous sample
    LowQueryDelta { delta: u64, window_minutes: u64 },
    /// Nothing is being blocked
    ZeroBlockingRate,
}

impl StatusReason {
    /// Stable reason tag
    pub fn code(&self) -> &'static str {
        match self {
            StatusReason::Offline => "offline",
            StatusReason::StaleCache { .. } => "stale-cache",
            StatusReason::NoQueryActivity => "no-query-activity",
            StatusReason::TooFewClients { .. } => "too-few-clients",
            StatusReason::LowQueryDelta { .. } => "low-query-delta",
            StatusReason::ZeroBlockingRate => "zero-blocking-rate",
        }
    }
}

/// Outcome of one evaluation; derived on every refresh, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    pub level: StatusLevel,
    pub reason: Option<StatusReason>,
}

impl StatusResult {
    /// Healthy, no reason
    pub fn ok() -> Self {
        Self {
            level: StatusLevel::Ok,
            reason: None,
        }
    }

    /// Degraded with the given reason
    pub fn warning(reason: StatusReason) -> Self {
        Self {
            level: StatusLevel::Warning,
            reason: Some(reason),
        }
    }

    /// Failing with the given reason
    pub fn error(reason: StatusReason) -> Self {
        Self {
            level: StatusLevel::Error,
            reason: Some(reason),
        }
    }

    /// Reason tag, if any
    pub fn reason_code(&self) -> Option<&'static str> {
        self.reason.as_ref().map(StatusReason::code)
    }
}
