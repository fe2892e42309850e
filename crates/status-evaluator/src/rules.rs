//! Ordered status rules

use crate::config::EvaluatorConfig;
use crate::status::{StatusReason, StatusResult};
use chrono::{DateTime, Utc};
use pihole_api::Sample;
use tracing::debug;

/// Inputs to one evaluation
struct Facts<'a> {
    current: &'a Sample,
    is_live: bool,
    previous: Option<&'a Sample>,
    now: DateTime<Utc>,
}

impl Facts<'_> {
    fn current_age(&self) -> Option<f64> {
        self.current.age_minutes(self.now)
    }
}

/// A rule either decides the status or cedes to the next one
struct Rule {
    name: &'static str,
    check: fn(&Facts<'_>, &EvaluatorConfig) -> Option<StatusResult>,
}

/// Priority order; the last rule always matches
const RULES: &[Rule] = &[
    Rule {
        name: "offline-no-data",
        check: offline_no_data,
    },
    Rule {
        name: "offline-stale",
        check: offline_stale,
    },
    Rule {
        name: "stale-cache",
        check: stale_cache,
    },
    Rule {
        name: "no-query-activity",
        check: no_query_activity,
    },
    Rule {
        name: "too-few-clients",
        check: too_few_clients,
    },
    Rule {
        name: "low-query-delta",
        check: low_query_delta,
    },
    Rule {
        name: "zero-blocking-rate",
        check: zero_blocking_rate,
    },
    Rule {
        name: "healthy",
        check: healthy,
    },
];

fn offline_no_data(facts: &Facts<'_>, _config: &EvaluatorConfig) -> Option<StatusResult> {
    (!facts.is_live && facts.current.fetched_at.is_none())
        .then(|| StatusResult::error(StatusReason::Offline))
}

fn offline_stale(facts: &Facts<'_>, config: &EvaluatorConfig) -> Option<StatusResult> {
    if facts.is_live {
        return None;
    }
    let age = facts.current_age()?;
    (age >= config.error_stale_minutes).then(|| StatusResult::error(StatusReason::Offline))
}

/// Cached data is at best a warning, however fresh
fn stale_cache(facts: &Facts<'_>, _config: &EvaluatorConfig) -> Option<StatusResult> {
    if facts.is_live {
        return None;
    }
    let age_minutes = facts.current_age().unwrap_or(0.0).max(0.0).floor() as u64;
    Some(StatusResult::warning(StatusReason::StaleCache { age_minutes }))
}

fn no_query_activity(facts: &Facts<'_>, _config: &EvaluatorConfig) -> Option<StatusResult> {
    (facts.is_live && facts.current.total_queries == 0)
        .then(|| StatusResult::error(StatusReason::NoQueryActivity))
}

fn too_few_clients(facts: &Facts<'_>, config: &EvaluatorConfig) -> Option<StatusResult> {
    let clients = facts.current.clients_total;
    (facts.is_live && clients <= config.clients_warn_max)
        .then(|| StatusResult::warning(StatusReason::TooFewClients { clients }))
}

/// Only fires with enough clients, a recent previous sample and a
/// non-negative delta; otherwise cedes without deciding
fn low_query_delta(facts: &Facts<'_>, config: &EvaluatorConfig) -> Option<StatusResult> {
    if !facts.is_live || facts.current.clients_total < config.delta_min_clients {
        return None;
    }

    let previous = facts.previous?;
    let previous_age = previous.age_minutes(facts.now)?;
    if previous_age <= 0.0 || previous_age > config.delta_window_minutes {
        return None;
    }

    let delta = facts.current.total_queries as i128 - previous.total_queries as i128;
    if delta < 0 || delta >= config.min_query_delta as i128 {
        return None;
    }

    Some(StatusResult::warning(StatusReason::LowQueryDelta {
        delta: delta as u64,
        window_minutes: config.delta_window_minutes.round() as u64,
    }))
}

fn zero_blocking_rate(facts: &Facts<'_>, _config: &EvaluatorConfig) -> Option<StatusResult> {
    (facts.is_live && facts.current.percentage_blocked == 0.0)
        .then(|| StatusResult::warning(StatusReason::ZeroBlockingRate))
}

fn healthy(_facts: &Facts<'_>, _config: &EvaluatorConfig) -> Option<StatusResult> {
    Some(StatusResult::ok())
}

/// Pure status classifier
#[derive(Debug, Clone, Default)]
pub struct StatusEvaluator {
    config: EvaluatorConfig,
}

impl StatusEvaluator {
    /// Create an evaluator with the given thresholds
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Classify `current` as of `now`
    ///
    /// `previous` is the sample cached before this refresh cycle and is only
    /// used for the query trend. Total over all inputs.
    pub fn evaluate(
        &self,
        current: &Sample,
        is_live: bool,
        previous: Option<&Sample>,
        now: DateTime<Utc>,
    ) -> StatusResult {
        let facts = Facts {
            current,
            is_live,
            previous,
            now,
        };

        for rule in RULES {
            if let Some(result) = (rule.check)(&facts, &self.config) {
                debug!("Status rule '{}' matched: {}", rule.name, result.level);
                return result;
            }
        }

        StatusResult::ok()
    }
}
