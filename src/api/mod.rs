//! HTTP API
//!
//! - `POST /api/audio-recognition/identify` - identify an uploaded clip
//! - `GET /api` - service status
//! - `GET /api/health` - uptime and version

pub mod error;
pub mod health;
pub mod identify;

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};

use crate::recognition::RecognitionService;
use crate::staging::UploadStaging;

pub use error::{ApiError, ApiResult};

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecognitionService>,
    pub staging: UploadStaging,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: Arc<RecognitionService>, staging: UploadStaging) -> Self {
        Self {
            service,
            staging,
            started_at: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(identify::identify_routes(max_upload_bytes))
        .merge(health::health_routes())
        .with_state(state)
}
