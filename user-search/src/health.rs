//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Number of records the source currently yields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<usize>,

    /// Failure description when not ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK if the record source loads, 503 otherwise.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let service = state.config().service.name.clone();

    match state.records().load().await {
        Ok(records) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                ready: true,
                service,
                records: Some(records.len()),
                message: None,
            }),
        ),
        Err(e) => {
            tracing::warn!("Record source not ready: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    ready: false,
                    service,
                    records: None,
                    message: Some("record source unavailable".to_string()),
                }),
            )
        }
    }
}
