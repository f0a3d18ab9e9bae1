//! lyrics.ovh HTTP client
//!
//! Lookups are cached by the exact `(artist, title)` pair. Every outcome is cached, failures
//! included, so a pair reaches the provider at most once per retention window.

use super::dto;
use crate::config::LyricsConfig;
use crate::recognition::cache::{CachePolicy, TtlCache};
use crate::recognition::domain::{LyricsResult, ProviderError};

/// Reason reported when the provider has nothing for the song.
pub const NO_LYRICS: &str = "No lyrics found for this song";

/// lyrics.ovh API client
pub struct LyricsClient {
    http_client: reqwest::Client,
    base_url: String,
    cache: TtlCache<(String, String), LyricsResult>,
}

impl LyricsClient {
    pub fn new(http_client: reqwest::Client, config: &LyricsConfig, cache_policy: CachePolicy) -> Self {
        Self {
            http_client,
            base_url: config.base_url.clone(),
            cache: TtlCache::new(cache_policy),
        }
    }

    /// Lyrics for a song, or the reason there are none.
    pub async fn lyrics(&self, artist: &str, title: &str) -> LyricsResult {
        let key = (artist.to_string(), title.to_string());
        if let Some(hit) = self.cache.get(&key) {
            return hit;
        }

        let result = match self.fetch(artist, title).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Lyrics lookup for '{} - {}' failed: {}", artist, title, e);
                LyricsResult::Error(format!("Failed to fetch lyrics: {}", e))
            }
        };
        self.cache.insert(key, result.clone());
        result
    }

    async fn fetch(&self, artist: &str, title: &str) -> Result<LyricsResult, ProviderError> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            tracing::info!(
                "No lyrics for '{} - {}' (HTTP {})",
                artist,
                title,
                status.as_u16()
            );
            return Ok(LyricsResult::Error(NO_LYRICS.to_string()));
        }

        let body: dto::LyricsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        match body.lyrics {
            Some(lyrics) if !lyrics.trim().is_empty() => {
                tracing::debug!("Lyrics for '{} - {}': {} chars", artist, title, lyrics.len());
                Ok(LyricsResult::Lyrics(lyrics))
            }
            _ => {
                if let Some(reason) = body.error {
                    tracing::info!("No lyrics for '{} - {}': {}", artist, title, reason);
                }
                Ok(LyricsResult::Error(NO_LYRICS.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{Hits, spawn_provider};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn lyrics_endpoint(
        State(hits): State<Hits>,
        Path((artist, title)): Path<(String, String)>,
    ) -> Response {
        hits.record();
        match (artist.as_str(), title.as_str()) {
            ("Artist X", "Song A") => Json(json!({"lyrics": "la la la"})).into_response(),
            ("AC/DC", "T.N.T.") => Json(json!({"lyrics": "Oi!"})).into_response(),
            ("Artist X", "Blank") => Json(json!({"lyrics": "   "})).into_response(),
            ("Artist X", "Broken") => "not json".into_response(),
            ("Artist X", "Refused") => Json(json!({"error": "No lyrics found"})).into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({"error": "No lyrics found"}))).into_response(),
        }
    }

    async fn client() -> (LyricsClient, Hits) {
        let hits = Hits::default();
        let app = Router::new()
            .route("/v1/:artist/:title", get(lyrics_endpoint))
            .with_state(hits.clone());
        let base = spawn_provider(app).await;
        let config = LyricsConfig {
            base_url: format!("{}/v1", base),
        };
        let client = LyricsClient::new(reqwest::Client::new(), &config, CachePolicy::default());
        (client, hits)
    }

    #[tokio::test]
    async fn test_found() {
        let (client, _) = client().await;
        let result = client.lyrics("Artist X", "Song A").await;
        assert_eq!(result, LyricsResult::Lyrics("la la la".into()));
    }

    #[tokio::test]
    async fn test_path_segments_are_encoded() {
        let (client, _) = client().await;
        let result = client.lyrics("AC/DC", "T.N.T.").await;
        assert_eq!(result.lyrics(), Some("Oi!"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let (client, _) = client().await;
        let result = client.lyrics("Nobody", "Nothing").await;
        assert_eq!(result, LyricsResult::Error(NO_LYRICS.into()));
    }

    #[tokio::test]
    async fn test_blank_lyrics_are_a_miss() {
        let (client, _) = client().await;
        let result = client.lyrics("Artist X", "Blank").await;
        assert_eq!(result, LyricsResult::Error(NO_LYRICS.into()));
    }

    #[tokio::test]
    async fn test_error_body_with_ok_status_is_a_miss() {
        let (client, _) = client().await;
        let result = client.lyrics("Artist X", "Refused").await;
        assert_eq!(result, LyricsResult::Error(NO_LYRICS.into()));
    }

    #[tokio::test]
    async fn test_repeated_pair_hits_upstream_once() {
        let (client, hits) = client().await;

        for _ in 0..3 {
            client.lyrics("Artist X", "Song A").await;
        }
        // Misses are cached too
        client.lyrics("Nobody", "Nothing").await;
        client.lyrics("Nobody", "Nothing").await;

        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_cache_is_case_sensitive() {
        let (client, hits) = client().await;
        client.lyrics("Artist X", "Song A").await;
        client.lyrics("artist x", "song a").await;
        assert_eq!(hits.count(), 2);
    }

    #[tokio::test]
    async fn test_parse_failure_is_reported_and_cached() {
        let (client, hits) = client().await;

        let result = client.lyrics("Artist X", "Broken").await;
        let LyricsResult::Error(reason) = result.clone() else {
            panic!("expected an error");
        };
        assert!(reason.starts_with("Failed to fetch lyrics:"));

        assert_eq!(client.lyrics("Artist X", "Broken").await, result);
        assert_eq!(hits.count(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let config = LyricsConfig {
            base_url: "http://127.0.0.1:9/v1".into(),
        };
        let client = LyricsClient::new(reqwest::Client::new(), &config, CachePolicy::default());
        let result = client.lyrics("Artist X", "Song A").await;
        assert!(result.lyrics().is_none());
        assert_eq!(client.cache.len(), 1);
    }
}
