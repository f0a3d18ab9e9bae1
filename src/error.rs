//! Application-wide error types.
//!
//! This module provides a unified error hierarchy for the application.
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`ProviderError`], [`StagingError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! Note that the recognition pipeline itself never returns these: its failures are
//! folded into a [`ConsolidatedResult`](crate::recognition::ConsolidatedResult). They
//! surface while wiring things up (config, HTTP client, staging, server).
//!
//! # Example
//!
//! ```ignore
//! use song_finder::error::{Result, ResultExt};
//!
//! fn read_clip(path: &Path) -> Result<Vec<u8>> {
//!     std::fs::read(path).with_context(format!("reading {}", path.display()))
//! }
//! ```

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::recognition::ProviderError;
use crate::staging::StagingError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Upload staging error
    #[error("Staging error: {0}")]
    Staging(#[from] StagingError),

    /// Catalog, lyrics or HTTP client error
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, StagingError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Staging(e).context(ctx))
    }
}
