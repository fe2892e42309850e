//! Status surface against a local stand-in for the Pi-hole API

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use sample_store::{MemorySecretStore, SecretStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use widget::render::RenderConfig;
use widget::server::{create_router, AppState};
use widget::settings::Settings;
use widget::build_orchestrator;

const PASSWORD: &str = "correct horse";

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn pihole() -> Router {
    Router::new()
        .route(
            "/api/auth",
            post(|| async { Json(json!({ "session": { "valid": true, "sid": "abc123" } })) }),
        )
        .route(
            "/api/stats/summary",
            get(|| async {
                Json(json!({
                    "queries": { "total": 2400, "blocked": 600, "percent_blocked": 25.0,
                                 "forwarded": 1200, "cached": 600, "unique_domains": 310 },
                    "clients": { "active": 3, "total": 5 },
                    "gravity": { "domains_being_blocked": 98000 }
                }))
            }),
        )
}

fn app(base_url: String, store: Arc<dyn SecretStore>) -> Router {
    let settings = Settings {
        base_url,
        login_timeout_secs: 2,
        stats_timeout_secs: 2,
        ..Default::default()
    };
    let orchestrator = build_orchestrator(&settings, store).unwrap();
    create_router(Arc::new(AppState::new(
        orchestrator,
        RenderConfig::default(),
        None,
    )))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let store: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
    let (status, body) = get_json(app("http://127.0.0.1:9".into(), store), "/api/v1/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_live_status() {
    let store: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
    store.set("pihole_admin_password_v1", PASSWORD).unwrap();
    let app = app(spawn(pihole()).await, Arc::clone(&store));

    let (status, body) = get_json(app, "/api/v1/status?family=small").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "live");
    assert_eq!(body["isLive"], true);
    assert_eq!(body["status"]["level"], "OK");
    assert_eq!(body["sample"]["totalQueries"], 2400);
    assert_eq!(body["family"], "small");
    assert!(body["error"].is_null());
    assert!(body["text"].as_str().unwrap().contains("[OK]"));

    // Live sample became the last known good one
    assert!(store.has("pihole_widget_cache_v6_enhanced_v1").unwrap());
}

#[tokio::test]
async fn test_status_without_password() {
    let store: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
    let app = app(spawn(pihole()).await, store);

    let (status, body) = get_json(app, "/api/v1/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "empty");
    assert_eq!(body["isLive"], false);
    assert_eq!(body["status"]["level"], "ERROR");
    assert_eq!(body["status"]["reason"]["code"], "offline");
    assert_eq!(body["error"], "No admin password stored");
    assert_eq!(body["family"], "medium");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let store: Arc<dyn SecretStore> = Arc::new(MemorySecretStore::new());
    let response = app("http://127.0.0.1:9".into(), store)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
