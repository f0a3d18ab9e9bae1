//! Song recognition module - identifies a clip and enriches it from external services.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **Decoders / DTOs** (`shazam/decoder.rs`, `spotify/dto.rs`) - Provider response shapes
//! - **Adapters** - Convert provider data to domain models
//! - **Clients** - HTTP clients for the three providers
//! - **Caches** (`cache.rs`, `spotify/token.rs`) - Shared, bounded provider state
//! - **Service** - Orchestration of recognition and best-effort enrichment
//!
//! Only the recognizer can fail a request. Catalog and lyrics problems are logged and
//! show up as absent fields in the [`ConsolidatedResult`].
//!
//! # Usage
//!
//! ```ignore
//! use song_finder::recognition::RecognitionService;
//!
//! let service = RecognitionService::from_config(&config)?;
//! let result = service.identify(&audio_bytes).await;
//! if result.success() {
//!     println!("{:?}", result.song());
//! }
//! ```

pub mod cache;
pub mod domain;
pub mod json;
pub mod lyrics;
pub mod service;
pub mod shazam;
pub mod spotify;
pub mod traits;

pub use domain::{
    Album, ArtistProfile, ConsolidatedResult, Image, LyricsResult, ProviderError,
    RecognitionError, RecognizedSong, SocialLink, Track,
};
pub use service::RecognitionService;

use crate::config::HttpConfig;

/// Build the HTTP client shared by every provider.
///
/// The client accepts gzip, identifies the application, and enforces the configured
/// per-call timeouts.
pub fn http_client(config: &HttpConfig) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .build()
        .map_err(|e| ProviderError::Network(format!("Failed to build HTTP client: {}", e)))
}
