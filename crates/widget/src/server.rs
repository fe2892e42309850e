//! HTTP status surface
//!
//! Each `/api/v1/status` request runs one refresh cycle. Cycles are
//! serialized behind a mutex so requests never overlap on the store.

use crate::render::{render_text, FormFactor, RenderConfig, WidgetView};
use crate::WidgetOrchestrator;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub orchestrator: Mutex<WidgetOrchestrator>,
    pub render: RenderConfig,
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        orchestrator: WidgetOrchestrator,
        render: RenderConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            orchestrator: Mutex::new(orchestrator),
            render,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Query parameters for the status endpoint
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub family: FormFactor,
}

/// Status response: structured view plus the rendered text
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub view: WidgetView,
    pub family: FormFactor,
    pub text: String,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/status", get(status_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

async fn status_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Json<StatusResponse> {
    let outcome = {
        let orchestrator = state.orchestrator.lock().await;
        orchestrator.refresh().await
    };

    let now = Utc::now();
    Json(StatusResponse {
        view: WidgetView::new(&outcome, &state.render, now),
        family: params.family,
        text: render_text(&outcome, params.family, &state.render, now),
    })
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Run the server until interrupted
pub async fn run_server(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    info!("Starting status server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
