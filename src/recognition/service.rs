//! Recognition service - orchestrates identification and enrichment
//!
//! This is the high-level API of the pipeline:
//! 1. Reject empty audio
//! 2. Identify the song (the only step that can fail the request)
//! 3. Concurrently fetch the artist profile and lyrics
//! 4. Consolidate whatever came back
//!
//! Enrichment branches run under a timeout and a panic guard; either problem only
//! blanks that branch's field. A panic anywhere else becomes a failure result.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use super::domain::{
    ArtistProfile, ConsolidatedResult, LyricsResult, ProviderError, RecognitionError,
    RecognizedSong,
};
use super::lyrics::LyricsClient;
use super::shazam::ShazamClient;
use super::spotify::{SpotifyClient, TokenCache};
use super::traits::{ArtistCatalog, LyricsProvider, SongRecognizer};
use crate::config::Config;
use crate::error::Result;

/// Pipeline over the three providers
pub struct RecognitionService {
    recognizer: Arc<dyn SongRecognizer>,
    catalog: Arc<dyn ArtistCatalog>,
    lyrics: Arc<dyn LyricsProvider>,
    enrichment_timeout: Duration,
}

impl RecognitionService {
    pub fn new(
        recognizer: Arc<dyn SongRecognizer>,
        catalog: Arc<dyn ArtistCatalog>,
        lyrics: Arc<dyn LyricsProvider>,
        enrichment_timeout: Duration,
    ) -> Self {
        Self {
            recognizer,
            catalog,
            lyrics,
            enrichment_timeout,
        }
    }

    /// Wire the production clients from configuration.
    ///
    /// Fails if a provider credential is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let rapidapi_key = config.credentials.rapidapi()?;
        let (client_id, client_secret) = config.credentials.spotify()?;

        let http = super::http_client(&config.http)?;
        let policy = config.cache.policy();

        let recognizer = ShazamClient::new(http.clone(), rapidapi_key, &config.recognition);
        let catalog = SpotifyClient::new(
            http.clone(),
            client_id,
            client_secret,
            &config.catalog,
            policy,
            TokenCache::new(),
        );
        let lyrics = LyricsClient::new(http, &config.lyrics, policy);

        Ok(Self::new(
            Arc::new(recognizer),
            Arc::new(catalog),
            Arc::new(lyrics),
            config.http.enrichment_timeout(),
        ))
    }

    /// Identify `audio` and enrich the result. Never fails; see [`ConsolidatedResult`].
    pub async fn identify(&self, audio: &[u8]) -> ConsolidatedResult {
        match AssertUnwindSafe(self.run(audio)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let cause = panic_message(panic.as_ref());
                tracing::error!("Recognition pipeline panicked: {}", cause);
                ConsolidatedResult::failure(format!("Recognition service error: {}", cause))
            }
        }
    }

    async fn run(&self, audio: &[u8]) -> ConsolidatedResult {
        if audio.is_empty() {
            tracing::warn!("Rejected empty audio payload");
            return ConsolidatedResult::failure(RecognitionError::EmptyAudio.user_message());
        }

        let song = match self.recognizer.identify(audio).await {
            Ok(song) => song,
            Err(e) => {
                tracing::info!("Recognition failed: {}", e);
                return ConsolidatedResult::failure(e.user_message());
            }
        };

        tracing::info!("Enriching '{}' by '{}'", song.title, song.artist);
        let (artist, lyrics) = tokio::join!(self.artist_profile(&song), self.song_lyrics(&song));

        ConsolidatedResult::identified(song, artist, lyrics)
    }

    async fn artist_profile(&self, song: &RecognizedSong) -> Option<ArtistProfile> {
        self.guarded("catalog", self.catalog.enrich(&song.artist, &song.title))
            .await
    }

    async fn song_lyrics(&self, song: &RecognizedSong) -> Option<String> {
        self.guarded("lyrics", async {
            let result = self.lyrics.lyrics(&song.artist, &song.title).await;
            if let LyricsResult::Error(reason) = &result {
                tracing::info!("No lyrics attached: {}", reason);
            }
            result.into_lyrics()
        })
        .await
    }

    /// Run one enrichment branch under the timeout and panic guard.
    async fn guarded<T>(&self, branch: &str, fut: impl Future<Output = Option<T>>) -> Option<T> {
        match tokio::time::timeout(self.enrichment_timeout, AssertUnwindSafe(fut).catch_unwind())
            .await
        {
            Ok(Ok(value)) => value,
            Ok(Err(panic)) => {
                tracing::warn!(
                    "{} enrichment panicked: {}",
                    branch,
                    panic_message(panic.as_ref())
                );
                None
            }
            Err(_) => {
                let err = ProviderError::Timeout(self.enrichment_timeout.as_secs());
                tracing::warn!("{} enrichment abandoned: {}", branch, err);
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}
