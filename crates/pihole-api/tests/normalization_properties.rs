//! Property tests: every normalized sample stays in range

use chrono::Utc;
use pihole_api::Sample;
use proptest::prelude::*;
use serde_json::{json, Value};

fn any_field() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(|n| json!(n)),
        any::<u64>().prop_map(|n| json!(n)),
        (-1.0e12f64..1.0e12f64).prop_map(|f| json!(f)),
        "[0-9a-z.-]{0,8}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn section(names: &'static [&'static str]) -> impl Strategy<Value = Value> {
    proptest::collection::vec(proptest::option::of(any_field()), names.len()).prop_map(
        move |values| {
            let mut map = serde_json::Map::new();
            for (name, value) in names.iter().zip(values) {
                if let Some(value) = value {
                    map.insert(name.to_string(), value);
                }
            }
            Value::Object(map)
        },
    )
}

fn stats_document() -> impl Strategy<Value = Value> {
    (
        proptest::option::of(section(&[
            "total",
            "blocked",
            "percent_blocked",
            "forwarded",
            "cached",
            "unique_domains",
        ])),
        proptest::option::of(section(&["total", "active"])),
        proptest::option::of(section(&["domains_being_blocked"])),
    )
        .prop_map(|(queries, clients, gravity)| {
            let mut doc = serde_json::Map::new();
            if let Some(q) = queries {
                doc.insert("queries".to_string(), q);
            }
            if let Some(c) = clients {
                doc.insert("clients".to_string(), c);
            }
            if let Some(g) = gravity {
                doc.insert("gravity".to_string(), g);
            }
            Value::Object(doc)
        })
}

proptest! {
    #[test]
    fn prop_percentage_within_bounds(doc in stats_document()) {
        let sample = Sample::from_stats(&doc, Utc::now());
        prop_assert!(sample.percentage_blocked.is_finite());
        prop_assert!((0.0..=100.0).contains(&sample.percentage_blocked));
        prop_assert!(sample.fetched_at.is_some());
    }

    #[test]
    fn prop_reported_percentage_kept_verbatim(p in 0.0f64..=100.0) {
        let doc = json!({ "queries": { "percent_blocked": p } });
        let sample = Sample::from_stats(&doc, Utc::now());
        prop_assert_eq!(sample.percentage_blocked, p);
    }

    #[test]
    fn prop_negative_counters_become_zero(n in i64::MIN..0) {
        let doc = json!({ "queries": { "total": n }, "clients": { "total": n } });
        let sample = Sample::from_stats(&doc, Utc::now());
        prop_assert_eq!(sample.total_queries, 0);
        prop_assert_eq!(sample.clients_total, 0);
    }
}
