//! Spotify Web API client
//!
//! Resolves an artist by name and assembles a full [`ArtistProfile`].
//! See: https://developer.spotify.com/documentation/web-api
//!
//! Resolution order:
//! 1. artist search (top hit only)
//! 2. artist details
//! 3. the album containing the recognized song, or the artist's albums as a fallback
//! 4. biography (see [`super::biography`]), which can use the albums from step 3
//!
//! Enrichment is best effort. Every failure is logged and reported as `None`.

use serde::de::DeserializeOwned;

use super::biography::{ArtistFacts, BiographyResolver};
use super::token::{self, TokenCache};
use super::{adapter, dto};
use crate::config::CatalogConfig;
use crate::recognition::cache::{CachePolicy, TtlCache};
use crate::recognition::domain::{Album, ArtistProfile, ProviderError};

/// Spotify API client
pub struct SpotifyClient {
    http_client: reqwest::Client,
    api_url: String,
    accounts_url: String,
    client_id: String,
    client_secret: String,
    album_limit: u32,
    track_search_limit: u32,
    tokens: TokenCache,
    artists: TtlCache<String, dto::Artist>,
    albums: TtlCache<String, Album>,
    artist_albums: TtlCache<String, Vec<Album>>,
    biography: BiographyResolver,
}

impl SpotifyClient {
    pub fn new(
        http_client: reqwest::Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        config: &CatalogConfig,
        cache_policy: CachePolicy,
        tokens: TokenCache,
    ) -> Self {
        Self {
            biography: BiographyResolver::standard(http_client.clone(), config),
            http_client,
            api_url: config.api_url.clone(),
            accounts_url: config.accounts_url.clone(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            album_limit: config.album_limit,
            track_search_limit: config.track_search_limit,
            tokens,
            artists: TtlCache::new(cache_policy),
            albums: TtlCache::new(cache_policy),
            artist_albums: TtlCache::new(cache_policy),
        }
    }

    /// Build the artist profile for `artist_name`, using `song_title` to pick the album.
    pub async fn enrich(&self, artist_name: &str, song_title: &str) -> Option<ArtistProfile> {
        match self.try_enrich(artist_name, song_title).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!("Catalog enrichment failed for '{}': {}", artist_name, e);
                None
            }
        }
    }

    async fn try_enrich(
        &self,
        artist_name: &str,
        song_title: &str,
    ) -> Result<Option<ArtistProfile>, ProviderError> {
        let token = self.access_token().await?;

        let Some(artist_id) = self.search_artist(&token, artist_name).await? else {
            tracing::info!("No catalog artist matches '{}'", artist_name);
            return Ok(None);
        };

        let artist = self.artist(&token, &artist_id).await?;
        let albums = self.albums_for(&token, &artist_id, song_title).await;

        let facts = ArtistFacts {
            id: &artist.id,
            name: &artist.name,
            genres: &artist.genres,
            popularity: artist.popularity,
            followers: artist.followers.total,
            albums: &albums,
            access_token: &token,
        };
        let biography = self.biography.resolve(&facts).await;

        tracing::info!(
            "Catalog profile for '{}' ({} albums)",
            artist.name,
            albums.len()
        );
        Ok(Some(adapter::to_profile(artist, albums, biography)))
    }

    async fn access_token(&self) -> Result<String, ProviderError> {
        self.tokens
            .get_or_refresh(|| {
                token::request_token(
                    &self.http_client,
                    &self.accounts_url,
                    &self.client_id,
                    &self.client_secret,
                )
            })
            .await
    }

    /// Id of the top artist search hit.
    async fn search_artist(
        &self,
        token: &str,
        artist_name: &str,
    ) -> Result<Option<String>, ProviderError> {
        let response: dto::ArtistSearchResponse = self
            .get_json(
                token,
                "/search",
                &[("q", artist_name), ("type", "artist"), ("limit", "1")],
            )
            .await?;

        Ok(response
            .artists
            .items
            .into_iter()
            .next()
            .map(|artist| artist.id)
            .filter(|id| !id.is_empty()))
    }

    async fn artist(&self, token: &str, artist_id: &str) -> Result<dto::Artist, ProviderError> {
        let path = format!("/artists/{}", artist_id);
        self.artists
            .get_or_try_fetch(artist_id.to_string(), || self.get_json(token, &path, &[]))
            .await
    }

    /// The album holding the song, else the artist's recent albums.
    ///
    /// Never fails: if both lookups fail the profile simply has no albums.
    async fn albums_for(&self, token: &str, artist_id: &str, song_title: &str) -> Vec<Album> {
        match self.album_with_song(token, artist_id, song_title).await {
            Ok(Some(album)) => return vec![album],
            Ok(None) => tracing::debug!("'{}' not found among the artist's tracks", song_title),
            Err(e) => tracing::debug!("Album lookup for '{}' failed: {}", song_title, e),
        }

        match self.artist_albums(token, artist_id).await {
            Ok(albums) => albums,
            Err(e) => {
                tracing::warn!("Could not list albums for artist {}: {}", artist_id, e);
                Vec::new()
            }
        }
    }

    async fn album_with_song(
        &self,
        token: &str,
        artist_id: &str,
        song_title: &str,
    ) -> Result<Option<Album>, ProviderError> {
        if song_title.trim().is_empty() {
            return Ok(None);
        }
        let limit = self.track_search_limit.to_string();
        let response: dto::TrackSearchResponse = self
            .get_json(
                token,
                "/search",
                &[("q", song_title), ("type", "track"), ("limit", limit.as_str())],
            )
            .await?;

        let Some(album_id) = adapter::matching_album(&response.tracks.items, artist_id) else {
            return Ok(None);
        };
        self.album(token, &album_id).await.map(Some)
    }

    /// Album details plus its track list.
    async fn album(&self, token: &str, album_id: &str) -> Result<Album, ProviderError> {
        self.albums
            .get_or_try_fetch(album_id.to_string(), || async {
                let album: dto::SimpleAlbum = self
                    .get_json(token, &format!("/albums/{}", album_id), &[])
                    .await?;
                let tracks = self.album_tracks(token, album_id).await?;
                Ok::<_, ProviderError>(adapter::to_album(album, tracks))
            })
            .await
    }

    async fn album_tracks(
        &self,
        token: &str,
        album_id: &str,
    ) -> Result<Vec<dto::SimpleTrack>, ProviderError> {
        let page: dto::Paging<dto::SimpleTrack> = self
            .get_json(token, &format!("/albums/{}/tracks", album_id), &[])
            .await?;
        Ok(page.items)
    }

    async fn artist_albums(&self, token: &str, artist_id: &str) -> Result<Vec<Album>, ProviderError> {
        self.artist_albums
            .get_or_try_fetch(artist_id.to_string(), || async {
                let limit = self.album_limit.to_string();
                let page: dto::Paging<dto::SimpleAlbum> = self
                    .get_json(
                        token,
                        &format!("/artists/{}/albums", artist_id),
                        &[("limit", limit.as_str())],
                    )
                    .await?;

                let mut albums = Vec::with_capacity(page.items.len());
                for album in page.items {
                    let tracks = match self.album_tracks(token, &album.id).await {
                        Ok(tracks) => tracks,
                        Err(e) => {
                            tracing::debug!("No tracks for album {}: {}", album.id, e);
                            Vec::new()
                        }
                    };
                    albums.push(adapter::to_album(album, tracks));
                }
                Ok::<_, ProviderError>(albums)
            })
            .await
    }

    /// Authorized GET against the Web API.
    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Next request fetches a new token
            self.tokens.invalidate();
            return Err(ProviderError::Auth(format!("{} rejected the access token", path)));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            return Err(ProviderError::from_status(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::spotify::biography::NO_BIOGRAPHY;
    use crate::test_utils::{Hits, spawn_provider, spotify_album, spotify_artist, spotify_tracks};
    use axum::extract::{Path, Query, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Clone)]
    struct FakeCatalog {
        token_ok: bool,
        artist_found: bool,
        track_matches: bool,
        page_bio: Option<&'static str>,
        token_hits: Hits,
        search_hits: Hits,
        artist_hits: Hits,
        fallback_hits: Hits,
    }

    impl Default for FakeCatalog {
        fn default() -> Self {
            Self {
                token_ok: true,
                artist_found: true,
                track_matches: true,
                page_bio: Some("Real biography"),
                token_hits: Hits::default(),
                search_hits: Hits::default(),
                artist_hits: Hits::default(),
                fallback_hits: Hits::default(),
            }
        }
    }

    async fn token(State(fake): State<FakeCatalog>) -> Response {
        fake.token_hits.record();
        if !fake.token_ok {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!({"access_token": "tok", "token_type": "bearer", "expires_in": 3600}))
            .into_response()
    }

    async fn search(
        State(fake): State<FakeCatalog>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<serde_json::Value> {
        fake.search_hits.record();
        match params.get("type").map(String::as_str) {
            Some("artist") if fake.artist_found => Json(json!({
                "artists": {"items": [{"id": "abc", "name": "Artist X"}], "total": 1}
            })),
            Some("artist") => Json(json!({"artists": {"items": [], "total": 0}})),
            _ => {
                let credited = if fake.track_matches { "abc" } else { "someone-else" };
                Json(json!({"tracks": {"items": [{
                    "id": "t1",
                    "name": "Song A",
                    "artists": [{"id": credited, "name": "Artist"}],
                    "album": {"id": "alb1", "name": "Greatest"}
                }], "total": 1}}))
            }
        }
    }

    async fn artist(State(fake): State<FakeCatalog>, Path(id): Path<String>) -> Json<serde_json::Value> {
        fake.artist_hits.record();
        Json(spotify_artist(&id, "Artist X"))
    }

    async fn artist_albums(State(fake): State<FakeCatalog>) -> Json<serde_json::Value> {
        fake.fallback_hits.record();
        Json(json!({"items": [
            spotify_album("f1", "First", "2010-01-01"),
            spotify_album("f2", "Second", "2012")
        ]}))
    }

    async fn artist_page(State(fake): State<FakeCatalog>) -> Response {
        match fake.page_bio {
            Some(bio) => format!(r#"<html><script>{{"biography":{{"text":"{}"}}}}</script></html>"#, bio)
                .into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn serve(fake: FakeCatalog) -> CatalogConfig {
        let app = Router::new()
            .route("/accounts/api/token", post(token))
            .route("/api/search", get(search))
            .route("/api/artists/:id", get(artist))
            .route("/api/artists/:id/albums", get(artist_albums))
            .route(
                "/api/albums/:id",
                get(|Path(id): Path<String>| async move {
                    Json(spotify_album(&id, "Greatest", "2019-05-03"))
                }),
            )
            .route(
                "/api/albums/:id/tracks",
                get(|| async { Json(spotify_tracks(&["Song A", "Song B"])) }),
            )
            .route("/web/artist/:id", get(artist_page))
            .route("/desktop/artists/:id/desktop", get(|| async { StatusCode::NOT_FOUND }))
            .with_state(fake);
        let base = spawn_provider(app).await;

        CatalogConfig {
            api_url: format!("{}/api", base),
            accounts_url: format!("{}/accounts", base),
            web_url: format!("{}/web", base),
            desktop_url: format!("{}/desktop", base),
            ..Default::default()
        }
    }

    fn client(config: &CatalogConfig) -> SpotifyClient {
        SpotifyClient::new(
            reqwest::Client::new(),
            "id",
            "secret",
            config,
            CachePolicy::default(),
            TokenCache::new(),
        )
    }

    #[tokio::test]
    async fn test_enrich_with_matching_album() {
        let fake = FakeCatalog::default();
        let config = serve(fake.clone()).await;

        let profile = client(&config).enrich("Artist X", "Song A").await.unwrap();

        assert_eq!(profile.id, "abc");
        assert_eq!(profile.name, "Artist X");
        assert_eq!(profile.followers, 1_234_567);
        assert_eq!(profile.genres, vec!["pop", "rock"]);
        assert_eq!(profile.biography, "Real biography");
        assert_eq!(profile.social_links[0].url, "https://open.spotify.com/artist/abc");
        assert_eq!(profile.albums.len(), 1);
        assert_eq!(profile.albums[0].id, "alb1");
        assert_eq!(profile.albums[0].tracks.len(), 2);
        assert_eq!(fake.fallback_hits.count(), 0);
    }

    #[tokio::test]
    async fn test_unmatched_song_falls_back_to_artist_albums() {
        let fake = FakeCatalog {
            track_matches: false,
            ..Default::default()
        };
        let config = serve(fake.clone()).await;

        let profile = client(&config).enrich("Artist X", "Song A").await.unwrap();

        let names: Vec<_> = profile.albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
        assert_eq!(profile.albums[0].tracks.len(), 2);
        assert_eq!(fake.fallback_hits.count(), 1);
    }

    #[tokio::test]
    async fn test_zero_artist_results_is_none() {
        let fake = FakeCatalog {
            artist_found: false,
            ..Default::default()
        };
        let config = serve(fake.clone()).await;

        assert!(client(&config).enrich("Artist X", "Song A").await.is_none());
        assert_eq!(fake.search_hits.count(), 1);
        assert_eq!(fake.artist_hits.count(), 0);
    }

    #[tokio::test]
    async fn test_token_failure_is_none() {
        let fake = FakeCatalog {
            token_ok: false,
            ..Default::default()
        };
        let config = serve(fake.clone()).await;

        assert!(client(&config).enrich("Artist X", "Song A").await.is_none());
        assert_eq!(fake.search_hits.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_page_bio_is_synthesized() {
        let fake = FakeCatalog {
            page_bio: None,
            ..Default::default()
        };
        let config = serve(fake).await;

        let profile = client(&config).enrich("Artist X", "Song A").await.unwrap();

        assert_ne!(profile.biography, NO_BIOGRAPHY);
        assert!(profile.biography.contains("most popular"));
        assert!(profile.biography.contains("1,234,567"));
        assert!(profile.biography.contains("\"Greatest\" (2019)"));
    }

    #[tokio::test]
    async fn test_repeated_enrich_uses_caches() {
        let fake = FakeCatalog::default();
        let config = serve(fake.clone()).await;
        let client = client(&config);

        client.enrich("Artist X", "Song A").await.unwrap();
        client.enrich("Artist X", "Song A").await.unwrap();

        assert_eq!(fake.token_hits.count(), 1);
        assert_eq!(fake.artist_hits.count(), 1);
        // Searches are not cached
        assert_eq!(fake.search_hits.count(), 4);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_none() {
        let config = CatalogConfig {
            api_url: "http://127.0.0.1:9/api".into(),
            accounts_url: "http://127.0.0.1:9/accounts".into(),
            ..Default::default()
        };
        assert!(client(&config).enrich("Artist X", "Song A").await.is_none());
    }
}
