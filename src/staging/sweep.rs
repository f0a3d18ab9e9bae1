//! Background sweeper for stale staged uploads.
//!
//! Uploads are normally deleted by their [`StagedUpload`](super::StagedUpload) handle. Files
//! left behind by a crash or a killed process are removed here once they are older than
//! the configured age.
//!
//! # Usage
//!
//! ```ignore
//! let handle = StaleUploadSweeper::new(&config.staging).start();
//! // ... on shutdown
//! handle.abort();
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::time::{Instant, interval_at};

use crate::config::StagingConfig;

/// Outcome of one sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: usize,
    pub failed: usize,
}

/// Delete regular files in `dir` last modified more than `max_age` before `now`.
///
/// A missing directory is an empty sweep.
pub fn sweep_once(dir: &Path, max_age: Duration, now: SystemTime) -> SweepReport {
    let mut report = SweepReport::default();

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
        Err(e) => {
            tracing::warn!(target: "sweeper", "Cannot read {:?}: {}", dir, e);
            return report;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if !age.is_some_and(|age| age >= max_age) {
            continue;
        }

        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(target: "sweeper", "Removed stale upload {:?}", path);
                report.removed += 1;
            }
            Err(e) => {
                tracing::warn!(target: "sweeper", "Failed to remove {:?}: {}", path, e);
                report.failed += 1;
            }
        }
    }

    report
}

/// Periodically sweeps the staging directory.
#[derive(Debug, Clone)]
pub struct StaleUploadSweeper {
    dir: PathBuf,
    max_age: Duration,
    period: Duration,
}

impl StaleUploadSweeper {
    pub fn new(config: &StagingConfig) -> Self {
        Self {
            dir: config.resolved_dir(),
            max_age: Duration::from_secs(config.max_age_secs),
            period: Duration::from_secs(config.sweep_interval_secs.max(1)),
        }
    }

    /// Start the sweeper background task.
    ///
    /// Returns immediately. The first sweep runs one period after start.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        let mut timer = interval_at(Instant::now() + self.period, self.period);
        tracing::info!(
            target: "sweeper",
            "Upload sweeper started for {:?} (every {}s)",
            self.dir,
            self.period.as_secs()
        );

        loop {
            timer.tick().await;

            let dir = self.dir.clone();
            let max_age = self.max_age;
            let report =
                tokio::task::spawn_blocking(move || sweep_once(&dir, max_age, SystemTime::now()))
                    .await;

            match report {
                Ok(report) if report.removed + report.failed > 0 => {
                    tracing::info!(
                        target: "sweeper",
                        "Removed {} stale uploads ({} failed)",
                        report.removed,
                        report.failed
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(target: "sweeper", "Sweep task failed: {}", e),
            }
        }
    }
}
