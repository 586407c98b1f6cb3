//! System endpoints: health check and session observability.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One active session as reported by the observability endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SessionDto {
    /// Session name.
    id: String,
    /// Current number of members.
    member_count: usize,
    /// Number of retained history events.
    history_len: usize,
    /// ISO-8601 creation time.
    created_at: String,
}

/// `GET /sessions` — List active sessions.
#[utoipa::path(
    get,
    path = "/sessions",
    tag = "System",
    summary = "List active sessions",
    description = "Returns every active session with its member count and retained history length.",
    responses(
        (status = 200, description = "Active sessions", body = Vec<SessionDto>),
    )
)]
pub async fn sessions_handler(State(state): State<AppState>) -> impl IntoResponse {
    let summaries = state.registry.summaries().await;
    let sessions: Vec<SessionDto> = summaries
        .into_iter()
        .map(|s| SessionDto {
            id: s.id.to_string(),
            member_count: s.member_count,
            history_len: s.history_len,
            created_at: s.created_at.to_rfc3339(),
        })
        .collect();
    (StatusCode::OK, Json(sessions))
}

/// System routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/sessions", get(sessions_handler))
}
