//! Upload staging - scoped temporary storage for uploaded audio.
//!
//! Every upload is written to its own file in the staging directory and handed back as a
//! [`StagedUpload`]. The file is removed when the handle is deleted or dropped, whichever
//! comes first, so no exit path leaks it. Files orphaned by a crash are collected by the
//! background [`sweep`]er.
//!
//! # Usage
//!
//! ```ignore
//! let staging = UploadStaging::new(&config.staging);
//! let upload = staging.store(&bytes, "audio/mpeg")?;
//! let audio = upload.read_limited()?;
//! // `upload` is deleted when it goes out of scope
//! ```

pub mod sweep;

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::StagingConfig;

/// Errors from storing or reading an upload
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("The provided audio is empty or invalid")]
    Empty,

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("Staging I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StagingError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Writes uploads into the staging directory.
#[derive(Debug, Clone)]
pub struct UploadStaging {
    dir: PathBuf,
    allowed_content_types: Vec<String>,
    max_processed_bytes: usize,
}

impl UploadStaging {
    pub fn new(config: &StagingConfig) -> Self {
        Self {
            dir: config.resolved_dir(),
            allowed_content_types: config
                .allowed_content_types
                .iter()
                .map(|ct| normalize_content_type(ct))
                .collect(),
            max_processed_bytes: config.max_processed_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether `content_type` (parameters ignored, case-insensitive) is an accepted audio type.
    pub fn is_allowed(&self, content_type: &str) -> bool {
        let content_type = normalize_content_type(content_type);
        self.allowed_content_types.iter().any(|ct| *ct == content_type)
    }

    /// Persist `bytes` to a fresh file in the staging directory.
    pub fn store(&self, bytes: &[u8], content_type: &str) -> Result<StagedUpload, StagingError> {
        if bytes.is_empty() {
            return Err(StagingError::Empty);
        }
        if !self.is_allowed(content_type) {
            return Err(StagingError::UnsupportedType(content_type.to_string()));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| StagingError::io(&self.dir, e))?;

        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(extension_for(content_type))
            .tempfile_in(&self.dir)
            .map_err(|e| StagingError::io(&self.dir, e))?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|e| StagingError::io(file.path(), e))?;

        tracing::debug!("Staged {} bytes at {:?}", bytes.len(), file.path());
        Ok(StagedUpload {
            path: file.path().to_path_buf(),
            file: Some(file),
            len: bytes.len(),
            max_processed_bytes: self.max_processed_bytes,
        })
    }
}

/// Handle to a staged upload. The file is deleted on [`delete`](Self::delete) or drop.
#[derive(Debug)]
pub struct StagedUpload {
    file: Option<NamedTempFile>,
    path: PathBuf,
    len: usize,
    max_processed_bytes: usize,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the original upload in bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_deleted(&self) -> bool {
        self.file.is_none()
    }

    /// Read back at most the configured number of bytes; the rest is dropped.
    pub fn read_limited(&self) -> Result<Vec<u8>, StagingError> {
        if self.is_deleted() {
            return Err(StagingError::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "upload already deleted"),
            ));
        }

        let file = File::open(&self.path).map_err(|e| StagingError::io(&self.path, e))?;
        let mut audio = Vec::with_capacity(self.len.min(self.max_processed_bytes));
        file.take(self.max_processed_bytes as u64)
            .read_to_end(&mut audio)
            .map_err(|e| StagingError::io(&self.path, e))?;

        if audio.len() < self.len {
            tracing::info!(
                "Audio reduced from {} bytes to {} bytes",
                self.len,
                audio.len()
            );
        }
        Ok(audio)
    }

    /// Remove the staged file. Calling this more than once is a no-op.
    pub fn delete(&mut self) -> Result<(), StagingError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        file.close().map_err(|e| StagingError::io(&self.path, e))?;
        tracing::debug!("Deleted staged upload {:?}", self.path);
        Ok(())
    }
}

/// `"Audio/MPEG; charset=binary"` → `"audio/mpeg"`.
fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn extension_for(content_type: &str) -> &'static str {
    match normalize_content_type(content_type).as_str() {
        "audio/mpeg" | "audio/mp3" => ".mp3",
        "audio/wav" | "audio/x-wav" | "audio/wave" => ".wav",
        "audio/ogg" => ".ogg",
        "audio/webm" => ".webm",
        "audio/mp4" | "audio/x-m4a" => ".m4a",
        "audio/aac" => ".aac",
        "audio/flac" | "audio/x-flac" => ".flac",
        _ => ".bin",
    }
}
