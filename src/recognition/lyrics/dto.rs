//! lyrics.ovh response shape
//!
//! `GET /v1/{artist}/{title}` answers `{"lyrics": "..."}` on a hit and
//! `{"error": "No lyrics found"}` with a 404 on a miss.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LyricsResponse {
    pub lyrics: Option<String>,
    pub error: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// ============================================================================
