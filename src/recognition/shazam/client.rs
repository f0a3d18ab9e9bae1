//! Shazam recognition HTTP client
//!
//! Posts a raw audio clip to the RapidAPI-hosted recognizer.
//!
//! ## API Quirks
//!
//! - The recognizer only needs a short window of audio. Anything past
//!   `max_audio_bytes` is cut off before upload; this is lossy on purpose.
//! - A 2xx response without a `track` object is a normal "no match", not an error
//!   of the transport.

use serde_json::Value;

use super::decoder;
use crate::config::RecognitionConfig;
use crate::recognition::domain::{RecognitionError, RecognizedSong};

const CONTENT_TYPE: &str = "application/octet-stream";

/// Shazam API client
pub struct ShazamClient {
    http_client: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_host: String,
    max_audio_bytes: usize,
}

impl ShazamClient {
    pub fn new(
        http_client: reqwest::Client,
        api_key: impl Into<String>,
        config: &RecognitionConfig,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            endpoint: config.endpoint.clone(),
            api_host: config.api_host.clone(),
            max_audio_bytes: config.max_audio_bytes,
        }
    }

    /// Identify the song in `audio`.
    pub async fn identify(&self, audio: &[u8]) -> Result<RecognizedSong, RecognitionError> {
        if audio.is_empty() {
            return Err(RecognitionError::EmptyAudio);
        }

        let payload = limit_audio(audio, self.max_audio_bytes);
        if payload.len() < audio.len() {
            tracing::info!(
                "Audio reduced from {} bytes to {} bytes",
                audio.len(),
                payload.len()
            );
        }

        tracing::info!("Sending {} bytes to recognition service", payload.len());
        let body = self.send_recognition_request(payload).await?;
        let song = decoder::decode(&body)?;

        tracing::info!("Recognized '{}' by '{}'", song.title, song.artist);
        Ok(song)
    }

    /// Send the HTTP request and parse the JSON body.
    async fn send_recognition_request(&self, payload: &[u8]) -> Result<Value, RecognitionError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = status.canonical_reason().unwrap_or("Unknown").to_string();
            tracing::error!("Recognition API error: {} - {}", status.as_u16(), message);
            return Err(RecognitionError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| RecognitionError::Network(e.to_string()))?;
        tracing::debug!("Recognition response: {} bytes", text.len());

        serde_json::from_str(&text).map_err(|e| RecognitionError::Parse(e.to_string()))
    }
}

/// The prefix of `audio` that is actually uploaded.
pub fn limit_audio(audio: &[u8], max_bytes: usize) -> &[u8] {
    &audio[..audio.len().min(max_bytes)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Hits, shazam_track, spawn_provider};
    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Captured {
        hits: Hits,
        body_len: Arc<Mutex<Option<usize>>>,
        api_key: Arc<Mutex<Option<String>>>,
    }

    async fn recognize(
        State(captured): State<Captured>,
        headers: HeaderMap,
        body: Bytes,
    ) -> Json<Value> {
        captured.hits.record();
        *captured.body_len.lock() = Some(body.len());
        *captured.api_key.lock() = headers
            .get("x-rapidapi-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        Json(shazam_track("Song A", "Artist X"))
    }

    fn client_for(endpoint: String, max_audio_bytes: usize) -> ShazamClient {
        let config = RecognitionConfig {
            endpoint,
            max_audio_bytes,
            ..Default::default()
        };
        ShazamClient::new(reqwest::Client::new(), "rapid-key", &config)
    }

    async fn serve_recognizer() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route("/recognize/file", post(recognize))
            .with_state(captured.clone());
        let base = spawn_provider(app).await;
        (format!("{}/recognize/file", base), captured)
    }

    #[test]
    fn test_limit_audio_keeps_small_payloads() {
        let audio = vec![1u8; 10];
        assert_eq!(limit_audio(&audio, 500_000).len(), 10);
    }

    proptest! {
        #[test]
        fn prop_limit_audio_is_prefix_of_at_most_max(len in 0usize..4096, max in 1usize..2048) {
            let audio: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let limited = limit_audio(&audio, max);
            prop_assert_eq!(limited.len(), len.min(max));
            prop_assert_eq!(limited, &audio[..limited.len()]);
        }
    }

    #[tokio::test]
    async fn test_identify_success() {
        let (endpoint, captured) = serve_recognizer().await;
        let client = client_for(endpoint, 500_000);

        let song = client.identify(&[7u8; 1000]).await.unwrap();

        assert_eq!(song.title, "Song A");
        assert_eq!(song.artist, "Artist X");
        assert_eq!(song.genres, vec!["Pop".to_string()]);
        assert_eq!(*captured.body_len.lock(), Some(1000));
        assert_eq!(captured.api_key.lock().as_deref(), Some("rapid-key"));
    }

    #[tokio::test]
    async fn test_oversized_audio_sends_exactly_max_bytes() {
        let (endpoint, captured) = serve_recognizer().await;
        let client = client_for(endpoint, 500_000);

        client.identify(&vec![0u8; 750_000]).await.unwrap();

        assert_eq!(*captured.body_len.lock(), Some(500_000));
    }

    #[tokio::test]
    async fn test_empty_audio_makes_no_request() {
        let (endpoint, captured) = serve_recognizer().await;
        let client = client_for(endpoint, 500_000);

        let result = client.identify(&[]).await;

        assert!(matches!(result, Err(RecognitionError::EmptyAudio)));
        assert_eq!(captured.hits.count(), 0);
    }

    #[tokio::test]
    async fn test_non_success_status_is_upstream_error() {
        let app = Router::new().route(
            "/recognize/file",
            post(|| async { (StatusCode::FORBIDDEN, "denied") }),
        );
        let base = spawn_provider(app).await;
        let client = client_for(format!("{}/recognize/file", base), 500_000);

        let result = client.identify(&[1, 2, 3]).await;

        match result {
            Err(RecognitionError::Upstream { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_no_track_is_not_identified() {
        let app = Router::new().route(
            "/recognize/file",
            post(|| async { Json(serde_json::json!({"matches": []})) }),
        );
        let base = spawn_provider(app).await;
        let client = client_for(format!("{}/recognize/file", base), 500_000);

        let result = client.identify(&[1, 2, 3]).await;
        assert!(matches!(result, Err(RecognitionError::NotIdentified)));
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let app = Router::new().route("/recognize/file", post(|| async { "<html>oops</html>" }));
        let base = spawn_provider(app).await;
        let client = client_for(format!("{}/recognize/file", base), 500_000);

        let result = client.identify(&[1]).await;
        assert!(matches!(result, Err(RecognitionError::Parse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is not listening in test environments
        let client = client_for("http://127.0.0.1:9/recognize/file".to_string(), 500_000);
        let result = client.identify(&[1]).await;
        assert!(matches!(result, Err(RecognitionError::Network(_))));
    }
}
