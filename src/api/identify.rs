//! Song identification endpoint
//!
//! `POST /api/audio-recognition/identify` with a multipart `audio` field.
//!
//! The upload is staged to disk, read back trimmed to the processing limit, run through
//! the pipeline, and deleted before the response is sent.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};

use super::AppState;
use super::error::{ApiError, ApiResult};
use crate::recognition::ConsolidatedResult;
use crate::staging::{StagedUpload, StagingError};

const AUDIO_FIELD: &str = "audio";

/// Content type assumed when the part doesn't declare one (never on the allow-list)
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

struct AudioPart {
    bytes: Bytes,
    content_type: String,
}

/// POST /api/audio-recognition/identify
pub async fn identify_song(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<ConsolidatedResult>> {
    let part = read_audio_part(multipart).await?;
    tracing::info!(
        "Processing upload of {} bytes ({})",
        part.bytes.len(),
        part.content_type
    );

    let staging = state.staging.clone();
    let staged = tokio::task::spawn_blocking(move || stage(&staging, &part)).await;

    let (mut upload, audio) = match staged {
        Ok(Ok(staged)) => staged,
        Ok(Err(e @ (StagingError::Empty | StagingError::UnsupportedType(_)))) => {
            return Err(ApiError::BadRequest(e.to_string()));
        }
        Ok(Err(e)) => return Ok(Json(processing_failure(e))),
        Err(e) => return Ok(Json(processing_failure(e))),
    };

    let result = state.service.identify(&audio).await;

    if let Err(e) = upload.delete() {
        tracing::warn!("Could not delete staged upload: {}", e);
    }
    Ok(Json(result))
}

fn stage(
    staging: &crate::staging::UploadStaging,
    part: &AudioPart,
) -> Result<(StagedUpload, Vec<u8>), StagingError> {
    let upload = staging.store(&part.bytes, &part.content_type)?;
    let audio = upload.read_limited()?;
    Ok((upload, audio))
}

fn processing_failure(err: impl std::fmt::Display) -> ConsolidatedResult {
    tracing::error!("Failed to stage upload: {}", err);
    ConsolidatedResult::failure(format!("Failed to process the request: {}", err))
}

/// First `audio` field of the form.
async fn read_audio_part(mut multipart: Multipart) -> ApiResult<AudioPart> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or(UNKNOWN_CONTENT_TYPE)
            .to_string();
        let bytes = field.bytes().await?;
        return Ok(AudioPart {
            bytes,
            content_type,
        });
    }

    Err(ApiError::BadRequest("No audio file was sent".to_string()))
}

/// Build identification routes
pub fn identify_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/audio-recognition/identify", post(identify_song))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
