//! Liveness endpoints

use axum::{Json, Router, extract::State, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::AppState;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// GET /api response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub message: String,
    pub timestamp: String,
}

/// GET /api/health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// `"{d}d {h}h {m}m {s}s"`
    pub uptime: String,
    pub start_time: String,
    pub timestamp: String,
}

/// GET /api
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        message: "Song recognition service is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime_seconds = now.signed_duration_since(state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "UP".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format_uptime(uptime_seconds),
        start_time: state.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = seconds % 86_400 / 3600;
    let minutes = seconds % 3600 / 60;
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds % 60)
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(status))
        .route("/api/health", get(health_check))
}
