//! End-to-end classification scenarios through the public API

use chrono::{DateTime, Duration, TimeZone, Utc};
use pihole_api::Sample;
use proptest::prelude::*;
use status_evaluator::{EvaluatorConfig, StatusEvaluator, StatusLevel, StatusReason, StatusResult};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, 8, 30, 0).unwrap()
}

fn live(total_queries: u64, clients_total: u64, percentage_blocked: f64) -> Sample {
    Sample {
        fetched_at: Some(now()),
        total_queries,
        clients_total,
        percentage_blocked,
        ..Default::default()
    }
}

#[test]
fn test_scenario_no_cache_offline() {
    let result = StatusEvaluator::default().evaluate(&Sample::zero_state(), false, None, now());
    assert_eq!(result.level, StatusLevel::Error);
    assert_eq!(result.reason_code(), Some("offline"));
}

#[test]
fn test_scenario_no_queries_with_many_clients() {
    let result = StatusEvaluator::default().evaluate(&live(0, 25, 12.0), true, None, now());
    assert_eq!(result, StatusResult::error(StatusReason::NoQueryActivity));
}

#[test]
fn test_scenario_low_delta() {
    let previous = Sample {
        fetched_at: Some(now() - Duration::minutes(10)),
        ..live(1000, 5, 20.0)
    };
    let result =
        StatusEvaluator::default().evaluate(&live(1005, 5, 20.0), true, Some(&previous), now());
    assert_eq!(result.level, StatusLevel::Warning);
    assert_eq!(result.reason_code(), Some("low-query-delta"));
}

#[test]
fn test_scenario_zero_blocking_without_previous() {
    let result = StatusEvaluator::default().evaluate(&live(800, 5, 0.0), true, None, now());
    assert_eq!(result, StatusResult::warning(StatusReason::ZeroBlockingRate));
}

#[test]
fn test_scenario_healthy() {
    let result = StatusEvaluator::default().evaluate(&live(800, 5, 23.4), true, None, now());
    assert_eq!(result, StatusResult::ok());
    assert_eq!(result.reason, None);
}

#[test]
fn test_custom_stale_threshold() {
    let evaluator = StatusEvaluator::new(EvaluatorConfig {
        error_stale_minutes: 15.0,
        ..Default::default()
    });
    let cached = Sample {
        fetched_at: Some(now() - Duration::minutes(15)),
        ..live(800, 5, 23.4)
    };
    assert_eq!(
        evaluator.evaluate(&cached, false, None, now()),
        StatusResult::error(StatusReason::Offline)
    );
}

#[test]
fn test_result_serialization() {
    let result = StatusResult::warning(StatusReason::TooFewClients { clients: 1 });
    let encoded = serde_json::to_value(&result).unwrap();
    assert_eq!(encoded["level"], "WARNING");
    assert_eq!(encoded["reason"]["code"], "too-few-clients");
    assert_eq!(encoded["reason"]["params"]["clients"], 1);

    let encoded = serde_json::to_value(StatusResult::ok()).unwrap();
    assert_eq!(encoded["level"], "OK");
    assert!(encoded["reason"].is_null());
}

fn any_sample() -> impl Strategy<Value = Sample> {
    (
        proptest::option::of(-600i64..600),
        0u64..5000,
        0u64..10,
        0.0f64..=100.0,
    )
        .prop_map(|(age, total_queries, clients_total, percentage_blocked)| Sample {
            fetched_at: age.map(|m| now() - Duration::minutes(m)),
            total_queries,
            clients_total,
            percentage_blocked,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn prop_cached_data_never_ok(current in any_sample(), previous in proptest::option::of(any_sample())) {
        let result = StatusEvaluator::default().evaluate(&current, false, previous.as_ref(), now());
        prop_assert_ne!(result.level, StatusLevel::Ok);
        let is_offline_or_stale = matches!(
            result.reason,
            Some(StatusReason::Offline) | Some(StatusReason::StaleCache { .. })
        );
        prop_assert!(is_offline_or_stale);
    }

    #[test]
    fn prop_live_data_never_offline(current in any_sample(), previous in proptest::option::of(any_sample())) {
        let result = StatusEvaluator::default().evaluate(&current, true, previous.as_ref(), now());
        let is_offline_or_stale = matches!(
            result.reason,
            Some(StatusReason::Offline) | Some(StatusReason::StaleCache { .. })
        );
        prop_assert!(!is_offline_or_stale);
    }

    #[test]
    fn prop_evaluation_is_deterministic(current in any_sample(), is_live in any::<bool>()) {
        let evaluator = StatusEvaluator::default();
        prop_assert_eq!(
            evaluator.evaluate(&current, is_live, None, now()),
            evaluator.evaluate(&current, is_live, None, now())
        );
    }
}
