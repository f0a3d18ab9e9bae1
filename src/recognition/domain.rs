//! Internal domain models for song recognition and enrichment.
//!
//! These types are OUR types - they don't change when provider APIs change.
//! Every provider response gets converted into these types by a decoder or adapter.

use serde::Serialize;

/// A song identified from an audio sample.
///
/// Only `title` and `artist` are guaranteed; the recognizer populates the rest inconsistently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedSong {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub release_date: Option<String>,
    /// Duration in seconds
    pub duration: Option<u32>,
    /// Only the recognizer's primary genre, when present
    pub genres: Vec<String>,
    /// Spotify URI advertised by the recognizer (e.g. `spotify:search:...`)
    pub spotify_uri: Option<String>,
    pub apple_music_id: Option<String>,
    pub cover_art_url: Option<String>,
    pub preview_url: Option<String>,
}

impl RecognizedSong {
    /// Create a song with only the mandatory fields set.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Default::default()
        }
    }
}

/// Artist profile assembled from the music catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    /// Always populated; see [`crate::recognition::spotify::biography`]
    pub biography: String,
    pub followers: u64,
    /// Catalog popularity index (0-100)
    pub popularity: u32,
    pub genres: Vec<String>,
    pub profile_url: Option<String>,
    pub social_links: Vec<SocialLink>,
    pub images: Vec<Image>,
    pub albums: Vec<Album>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    pub cover_url: Option<String>,
    /// Provider order
    pub tracks: Vec<Track>,
}

impl Album {
    /// Four-digit release year, if the release date starts with one.
    pub fn release_year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        let year = date.get(..4)?;
        year.chars().all(|c| c.is_ascii_digit()).then_some(year)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub preview_url: Option<String>,
}

/// Outcome of a lyrics lookup: text or a human-readable reason, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsResult {
    Lyrics(String),
    Error(String),
}

impl LyricsResult {
    pub fn lyrics(&self) -> Option<&str> {
        match self {
            Self::Lyrics(text) => Some(text),
            Self::Error(_) => None,
        }
    }

    pub fn into_lyrics(self) -> Option<String> {
        match self {
            Self::Lyrics(text) => Some(text),
            Self::Error(_) => None,
        }
    }
}

/// The single value returned to callers of the pipeline.
///
/// Fields are private so the success/payload invariant can only be built through
/// [`ConsolidatedResult::failure`] and [`ConsolidatedResult::identified`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedResult {
    success: bool,
    message: String,
    song: Option<RecognizedSong>,
    artist: Option<ArtistProfile>,
    lyrics: Option<String>,
}

impl ConsolidatedResult {
    pub const IDENTIFIED_MESSAGE: &'static str = "Song identified successfully";

    /// A failed request; carries no payloads.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            song: None,
            artist: None,
            lyrics: None,
        }
    }

    /// A recognized song with whatever enrichment succeeded.
    pub fn identified(
        song: RecognizedSong,
        artist: Option<ArtistProfile>,
        lyrics: Option<String>,
    ) -> Self {
        Self {
            success: true,
            message: Self::IDENTIFIED_MESSAGE.to_string(),
            song: Some(song),
            artist,
            lyrics,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn song(&self) -> Option<&RecognizedSong> {
        self.song.as_ref()
    }

    pub fn artist(&self) -> Option<&ArtistProfile> {
        self.artist.as_ref()
    }

    pub fn lyrics(&self) -> Option<&str> {
        self.lyrics.as_deref()
    }
}

/// Errors raised by the enrichment providers (catalog, lyrics, biography sources).
///
/// These never reach the caller of the pipeline; they are logged and degraded to absent fields.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

impl ProviderError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Upstream {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}

/// Why the recognizer could not produce a song.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RecognitionError {
    #[error("Audio payload is empty")]
    EmptyAudio,

    #[error("Recognizer returned no track")]
    NotIdentified,

    #[error("Recognizer returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse recognizer response: {0}")]
    Parse(String),
}

impl RecognitionError {
    /// Message suitable for the `message` field of a failed [`ConsolidatedResult`].
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyAudio => "The provided audio is empty or invalid".to_string(),
            Self::NotIdentified => {
                "Could not identify the song. Try a different audio clip.".to_string()
            }
            Self::Upstream { message, .. } => {
                format!("Failed to reach the recognition service: {}", message)
            }
            Self::Network(cause) | Self::Parse(cause) => {
                format!("Recognition service error: {}", cause)
            }
        }
    }
}
