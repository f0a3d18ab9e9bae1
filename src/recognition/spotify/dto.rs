//! Spotify Web API Data Transfer Objects
//!
//! These types match what the Spotify Web API returns.
//! DO NOT use these types outside the spotify module - convert to domain types.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api
//!
//! The catalog omits or nulls fields freely, so every field has a default and
//! nothing here is allowed to fail deserialization of an otherwise usable response.

use serde::Deserialize;

/// Client-credentials token response (`POST /api/token`)
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: u64,
}

/// `GET /search?type=artist`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistSearchResponse {
    pub artists: Paging<SimpleArtist>,
}

/// `GET /search?type=track`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackSearchResponse {
    pub tracks: Paging<SearchTrack>,
}

/// Generic page of results
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paging<T> {
    pub items: Vec<T>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

/// Artist as embedded in search results and track objects
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimpleArtist {
    pub id: String,
    pub name: String,
}

/// Full artist object (`GET /artists/{id}`)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u32,
    pub followers: Followers,
    pub external_urls: ExternalUrls,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

/// Track as returned by track search (carries its album and artists)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<SimpleArtist>,
    pub album: Option<SimpleAlbum>,
}

/// Album object (`GET /albums/{id}`, `GET /artists/{id}/albums` items)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimpleAlbum {
    pub id: String,
    pub name: String,
    pub release_date: Option<String>,
    pub images: Vec<Image>,
}

/// Track as listed by `GET /albums/{id}/tracks`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimpleTrack {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub preview_url: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
