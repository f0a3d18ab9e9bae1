//! Test utilities and fixtures for song-finder tests.
//!
//! Provider clients are exercised against fake upstreams: a small axum router served on an
//! ephemeral localhost port. Handlers can capture requests through shared state.
//!
//! # Example
//!
//! ```ignore
//! use song_finder::test_utils::spawn_provider;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = Router::new().route("/v1/:artist/:title", get(handler));
//!     let base_url = spawn_provider(app).await;
//!     // point a client at base_url ...
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use serde_json::{Value, json};

use crate::config::Config;

/// Serve `router` on 127.0.0.1 with a random port and return its base URL.
///
/// The server task lives until the test runtime shuts down.
pub async fn spawn_provider(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake provider");
    let addr = listener.local_addr().expect("Fake provider has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    format!("http://{}", addr)
}

/// Shared request counter for fake provider handlers.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A config whose every provider URL points at `base_url`.
///
/// Path prefixes keep the providers apart on one fake server:
/// `/shazam`, `/spotify/api`, `/spotify/accounts`, `/spotify/web`, `/spotify/desktop`, `/lyrics`.
pub fn config_for(base_url: &str) -> Config {
    let mut config = Config::default();
    config.credentials.rapidapi_key = Some("rapid-key".to_string());
    config.credentials.spotify_client_id = Some("client-id".to_string());
    config.credentials.spotify_client_secret = Some("client-secret".to_string());
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 5;
    config.http.enrichment_timeout_secs = 10;
    config.recognition.endpoint = format!("{}/shazam/recognize/file", base_url);
    config.catalog.api_url = format!("{}/spotify/api", base_url);
    config.catalog.accounts_url = format!("{}/spotify/accounts", base_url);
    config.catalog.web_url = format!("{}/spotify/web", base_url);
    config.catalog.desktop_url = format!("{}/spotify/desktop", base_url);
    config.lyrics.base_url = format!("{}/lyrics", base_url);
    config
}

/// A minimal recognizer response for the given song.
pub fn shazam_track(title: &str, artist: &str) -> Value {
    json!({
        "track": {
            "title": title,
            "subtitle": artist,
            "genres": {"primary": "Pop"}
        }
    })
}

/// A catalog artist object.
pub fn spotify_artist(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "genres": ["pop", "rock"],
        "popularity": 85,
        "followers": {"href": null, "total": 1_234_567},
        "external_urls": {"spotify": format!("https://open.spotify.com/artist/{}", id)},
        "images": [
            {"url": "https://img.example/640.jpg", "height": 640, "width": 640},
            {"url": "https://img.example/any.jpg", "height": null, "width": null}
        ]
    })
}

/// A catalog album object (without tracks).
pub fn spotify_album(id: &str, name: &str, release_date: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "release_date": release_date,
        "images": [{"url": format!("https://img.example/{}.jpg", id), "height": 300, "width": 300}]
    })
}

/// A page of simplified catalog tracks.
pub fn spotify_tracks(names: &[&str]) -> Value {
    let items: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": format!("track-{}", i),
                "name": name,
                "duration_ms": 200_000 + i as u64,
                "preview_url": null
            })
        })
        .collect();
    json!({ "items": items })
}
