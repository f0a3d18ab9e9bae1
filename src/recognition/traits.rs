//! Trait definitions for the three upstream providers.
//!
//! The orchestrator only talks to these traits, so tests can substitute mock
//! implementations. Production code uses the real clients.
//!
//! # Example
//!
//! ```ignore
//! use song_finder::recognition::traits::SongRecognizer;
//!
//! // In production code:
//! async fn run<R: SongRecognizer>(recognizer: &R, audio: &[u8]) {
//!     let song = recognizer.identify(audio).await?;
//! }
//!
//! // In tests:
//! let recognizer = MockRecognizer::identifies("Song A", "Artist X");
//! ```

use async_trait::async_trait;

use super::domain::{ArtistProfile, LyricsResult, RecognitionError, RecognizedSong};

/// Audio fingerprint recognition.
#[async_trait]
pub trait SongRecognizer: Send + Sync {
    /// Identify the song contained in `audio`.
    async fn identify(&self, audio: &[u8]) -> Result<RecognizedSong, RecognitionError>;
}

/// Catalog enrichment. Absorbs its own failures: `None` means "nothing usable".
#[async_trait]
pub trait ArtistCatalog: Send + Sync {
    async fn enrich(&self, artist_name: &str, song_title: &str) -> Option<ArtistProfile>;
}

/// Lyrics lookup. Never fails; misses are reported inside [`LyricsResult`].
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    async fn lyrics(&self, artist: &str, title: &str) -> LyricsResult;
}

// Implement traits for real clients

#[async_trait]
impl SongRecognizer for super::shazam::ShazamClient {
    async fn identify(&self, audio: &[u8]) -> Result<RecognizedSong, RecognitionError> {
        self.identify(audio).await
    }
}

#[async_trait]
impl ArtistCatalog for super::spotify::SpotifyClient {
    async fn enrich(&self, artist_name: &str, song_title: &str) -> Option<ArtistProfile> {
        self.enrich(artist_name, song_title).await
    }
}

#[async_trait]
impl LyricsProvider for super::lyrics::LyricsClient {
    async fn lyrics(&self, artist: &str, title: &str) -> LyricsResult {
        self.lyrics(artist, title).await
    }
}

/// Mock providers for testing.
///
/// Every mock counts its calls so tests can assert which upstreams were contacted.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Mock recognizer returning a fixed outcome.
    pub struct MockRecognizer {
        pub outcome: Result<RecognizedSong, RecognitionError>,
        pub calls: AtomicUsize,
        /// Lengths of every payload received
        pub received: Mutex<Vec<usize>>,
    }

    impl MockRecognizer {
        pub fn identifies(title: &str, artist: &str) -> Self {
            Self::with_outcome(Ok(RecognizedSong::new(title, artist)))
        }

        pub fn with_error(error: RecognitionError) -> Self {
            Self::with_outcome(Err(error))
        }

        pub fn with_outcome(outcome: Result<RecognizedSong, RecognitionError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
                received: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SongRecognizer for MockRecognizer {
        async fn identify(&self, audio: &[u8]) -> Result<RecognizedSong, RecognitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.received.lock().push(audio.len());
            self.outcome.clone()
        }
    }

    /// How a mock catalog should behave.
    pub enum CatalogBehavior {
        Profile(ArtistProfile),
        Absent,
        Panic,
        Hang,
    }

    pub struct MockCatalog {
        pub behavior: CatalogBehavior,
        pub calls: AtomicUsize,
    }

    impl MockCatalog {
        pub fn with_profile(name: &str) -> Self {
            Self::new(CatalogBehavior::Profile(ArtistProfile {
                id: "artist-1".to_string(),
                name: name.to_string(),
                biography: "A biography.".to_string(),
                ..Default::default()
            }))
        }

        pub fn absent() -> Self {
            Self::new(CatalogBehavior::Absent)
        }

        pub fn new(behavior: CatalogBehavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArtistCatalog for MockCatalog {
        async fn enrich(&self, _artist_name: &str, _song_title: &str) -> Option<ArtistProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                CatalogBehavior::Profile(profile) => Some(profile.clone()),
                CatalogBehavior::Absent => None,
                CatalogBehavior::Panic => panic!("catalog exploded"),
                CatalogBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    None
                }
            }
        }
    }

    pub struct MockLyrics {
        pub result: LyricsResult,
        pub calls: AtomicUsize,
    }

    impl MockLyrics {
        pub fn found(text: &str) -> Self {
            Self::new(LyricsResult::Lyrics(text.to_string()))
        }

        pub fn missing() -> Self {
            Self::new(LyricsResult::Error("No lyrics found for this song".to_string()))
        }

        pub fn new(result: LyricsResult) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LyricsProvider for MockLyrics {
        async fn lyrics(&self, _artist: &str, _title: &str) -> LyricsResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_recognizer_records_payloads() {
            let mock = MockRecognizer::identifies("Song", "Artist");
            let song = mock.identify(&[1, 2, 3]).await.unwrap();
            assert_eq!(song.title, "Song");
            assert_eq!(mock.call_count(), 1);
            assert_eq!(*mock.received.lock(), vec![3]);
        }

        #[tokio::test]
        async fn test_mock_recognizer_error() {
            let mock = MockRecognizer::with_error(RecognitionError::NotIdentified);
            let result = mock.identify(&[1]).await;
            assert!(matches!(result, Err(RecognitionError::NotIdentified)));
        }

        #[tokio::test]
        async fn test_mock_catalog_absent() {
            let mock = MockCatalog::absent();
            assert!(mock.enrich("a", "b").await.is_none());
            assert_eq!(mock.call_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_lyrics() {
            let mock = MockLyrics::found("words");
            assert_eq!(mock.lyrics("a", "b").await.lyrics(), Some("words"));
        }
    }
}
