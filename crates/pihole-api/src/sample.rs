//! Normalized Statistics Sample

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Statistics snapshot at one point in time
///
/// Always fully populated: counters the source omits are 0. The default
/// value is the zero-state (no timestamp, all counters 0) used when neither
/// live nor cached data is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sample {
    /// Time of the successful parse; `None` only in the zero-state
    pub fetched_at: Option<DateTime<Utc>>,
    pub total_queries: u64,
    pub queries_blocked: u64,
    /// Blocking rate in percent, [0, 100]
    pub percentage_blocked: f64,
    pub domains_on_list: u64,
    pub forwarded: u64,
    #[serde(alias = "cached")]
    pub cached_count: u64,
    pub unique_domains: u64,
    pub clients_total: u64,
}

impl Sample {
    /// Sample shown when there is no data anywhere
    pub fn zero_state() -> Self {
        Self::default()
    }

    /// Whether this is the synthesized zero-state
    pub fn is_zero_state(&self) -> bool {
        self.fetched_at.is_none()
    }

    /// Map a `/api/stats/summary` document into a sample
    ///
    /// Reads `queries.{total,blocked,percent_blocked,forwarded,cached,unique_domains}`,
    /// `clients.total` and `gravity.domains_being_blocked`. Extra fields are
    /// ignored. The blocking rate is taken as reported, not recomputed.
    pub fn from_stats(document: &Value, fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at: Some(fetched_at),
            total_queries: counter(document, "queries", "total"),
            queries_blocked: counter(document, "queries", "blocked"),
            percentage_blocked: percentage(field(document, "queries", "percent_blocked")),
            domains_on_list: counter(document, "gravity", "domains_being_blocked"),
            forwarded: counter(document, "queries", "forwarded"),
            cached_count: counter(document, "queries", "cached"),
            unique_domains: counter(document, "queries", "unique_domains"),
            clients_total: counter(document, "clients", "total"),
        }
    }

    /// Age in minutes relative to `now`; `None` for the zero-state
    ///
    /// Negative when the timestamp lies in the future.
    pub fn age_minutes(&self, now: DateTime<Utc>) -> Option<f64> {
        self.fetched_at
            .map(|at| (now - at).num_milliseconds() as f64 / 60_000.0)
    }
}

fn field<'a>(document: &'a Value, section: &str, name: &str) -> Option<&'a Value> {
    document.get(section).and_then(|s| s.get(name))
}

/// Numbers and numeric strings count, anything else is absent
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn counter(document: &Value, section: &str, name: &str) -> u64 {
    let Some(value) = field(document, section, name) else {
        return 0;
    };
    if let Some(exact) = value.as_u64() {
        return exact;
    }
    match number(value) {
        Some(n) if n.is_finite() && n > 0.0 => n as u64,
        _ => 0,
    }
}

fn percentage(value: Option<&Value>) -> f64 {
    match value.and_then(number) {
        Some(p) if p.is_finite() => p.clamp(0.0, 100.0),
        _ => 0.0,
    }
}
