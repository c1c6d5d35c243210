use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use purebred_shared::errors::{AppError, AppResult};
use purebred_shared::{HealthCheck, HealthResponse, HealthStatus};

use crate::store::COLLECTIONS;
use crate::AppState;

const SERVICE_NAME: &str = "purebred-api";

#[derive(Debug, Serialize)]
pub struct Banner {
    pub message: &'static str,
}

/// GET /
pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Purebred Pet Matchmaking API running",
    })
}

/// GET /health - liveness plus a store probe.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    let store_check = match state.store.ping().await {
        Ok(()) => HealthCheck::healthy("store"),
        Err(e) => HealthCheck::unhealthy("store", e.to_string()),
    };

    let response = HealthResponse::healthy(SERVICE_NAME, env!("CARGO_PKG_VERSION"))
        .with_checks(vec![store_check]);

    let status = match response.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status, Json(response)).into_response()
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub collections: Vec<&'static str>,
}

/// GET /schema - record collections served by this API.
pub async fn schema() -> Json<SchemaResponse> {
    Json(SchemaResponse {
        collections: COLLECTIONS.to_vec(),
    })
}

#[derive(Debug, Serialize)]
pub struct StoreDiagnostics {
    pub backend: &'static str,
    pub database: String,
    pub database_url: &'static str,
    pub database_name: &'static str,
    pub connection_status: &'static str,
    pub collections: Vec<String>,
}

/// GET /test - store connectivity report. Never fails; problems are
/// reported in the body.
pub async fn test_database(State(state): State<Arc<AppState>>) -> Json<StoreDiagnostics> {
    let mut report = StoreDiagnostics {
        backend: "running",
        database: "not available".into(),
        database_url: if state.config.database_url.is_some() { "set" } else { "not set" },
        database_name: state.store.backend(),
        connection_status: "not connected",
        collections: Vec::new(),
    };

    if let Err(e) = state.store.ping().await {
        report.database = format!("error: {}", truncate(&e.to_string(), 50));
        return Json(report);
    }
    report.connection_status = "connected";

    match state.store.collection_names().await {
        Ok(mut names) => {
            names.truncate(10);
            report.collections = names;
            report.database = "connected & working".into();
        }
        Err(e) => {
            report.database = format!("connected but error: {}", truncate(&e.to_string(), 50));
        }
    }

    Json(report)
}

/// GET /metrics - Prometheus exposition.
pub async fn metrics(State(state): State<Arc<AppState>>) -> AppResult<String> {
    state
        .metrics_handle
        .as_ref()
        .map(|h| h.render())
        .ok_or_else(|| AppError::not_found("metrics recorder not installed"))
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
