//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\song-finder\config.toml
//! - macOS: ~/Library/Application Support/song-finder/config.toml
//! - Linux: ~/.config/song-finder/config.toml
//!
//! Every section has working defaults, so a missing or partial file is fine.
//! Credentials can also come from the environment (see the CLI flags).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::recognition::cache::CachePolicy;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,
    pub http: HttpConfig,
    pub recognition: RecognitionConfig,
    pub catalog: CatalogConfig,
    pub lyrics: LyricsConfig,
    pub cache: CacheConfig,
    pub staging: StagingConfig,
    pub server: ServerConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// RapidAPI key for the Shazam recognition endpoint
    pub rapidapi_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

impl Credentials {
    /// The RapidAPI key, or an error naming the missing setting.
    pub fn rapidapi(&self) -> Result<&str, ConfigError> {
        required(&self.rapidapi_key, "rapidapi_key")
    }

    /// Spotify client id and secret.
    pub fn spotify(&self) -> Result<(&str, &str), ConfigError> {
        Ok((
            required(&self.spotify_client_id, "spotify_client_id")?,
            required(&self.spotify_client_secret, "spotify_client_secret")?,
        ))
    }
}

/// Blank values (e.g. `RAPIDAPI_KEY=""`) count as missing.
fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

/// Upstream HTTP behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout for every upstream call
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Budget for each enrichment branch (catalog makes several calls)
    pub enrichment_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 30,
            enrichment_timeout_secs: 60,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(self.enrichment_timeout_secs)
    }
}

/// Fingerprint recognizer (Shazam via RapidAPI)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub endpoint: String,
    pub api_host: String,
    /// Audio beyond this many bytes is dropped before upload
    pub max_audio_bytes: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://shazam-song-recognition-api.p.rapidapi.com/recognize/file"
                .to_string(),
            api_host: "shazam-song-recognition-api.p.rapidapi.com".to_string(),
            max_audio_bytes: 500_000,
        }
    }
}

/// Music catalog (Spotify)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_url: String,
    pub accounts_url: String,
    /// Public web player, scraped for biographies
    pub web_url: String,
    /// Legacy desktop backend exposing `biography.text`
    pub desktop_url: String,
    /// Albums fetched when the recognized song's album can't be found
    pub album_limit: u32,
    /// Track search window used to locate the recognized song's album
    pub track_search_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.spotify.com/v1".to_string(),
            accounts_url: "https://accounts.spotify.com".to_string(),
            web_url: "https://open.spotify.com".to_string(),
            desktop_url: "https://spclient.wg.spotify.com/open-backend-2/v1".to_string(),
            album_limit: 10,
            track_search_limit: 50,
        }
    }
}

/// Lyrics provider (lyrics.ovh)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub base_url: String,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.lyrics.ovh/v1".to_string(),
        }
    }
}

/// Shared policy for lyrics and catalog result caches
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            capacity: 1000,
        }
    }
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: Duration::from_secs(self.ttl_secs),
            capacity: self.capacity,
        }
    }
}

/// Temporary storage for uploaded audio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    /// Upload directory (empty = `<tmp>/song-finder-uploads`)
    pub dir: Option<PathBuf>,
    pub allowed_content_types: Vec<String>,
    /// Staged audio is trimmed to this many bytes when read back
    pub max_processed_bytes: usize,
    /// Largest request body the HTTP surface accepts
    pub max_upload_bytes: usize,
    /// Files older than this are removed by the sweeper
    pub max_age_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            allowed_content_types: [
                "audio/mpeg",
                "audio/mp3",
                "audio/wav",
                "audio/x-wav",
                "audio/wave",
                "audio/ogg",
                "audio/webm",
                "audio/mp4",
                "audio/x-m4a",
                "audio/aac",
                "audio/flac",
                "audio/x-flac",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_processed_bytes: 500_000,
            max_upload_bytes: 10 * 1024 * 1024,
            max_age_secs: 3600,
            sweep_interval_secs: 3600,
        }
    }
}

impl StagingConfig {
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("song-finder-uploads"))
    }
}

/// HTTP server settings for `serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("song-finder"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from an explicit path, with the same fallback rules as [`load`].
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to `path`.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

// ============================================================================
// Tests
// ============================================================================
