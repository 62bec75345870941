//! Scan progress reporting.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::broadcast;

/// Receiving end of a builder's progress channel.
pub type ProgressReceiver = broadcast::Receiver<ScanProgress>;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files scanned so far.
    pub files_scanned: u64,
    /// Number of directories scanned so far.
    pub dirs_scanned: u64,
    /// Total bytes scanned so far.
    pub bytes_scanned: u64,
    /// Path most recently visited.
    pub current_path: PathBuf,
    /// Number of warnings recorded so far.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
    /// Set on the last update of a scan.
    pub finished: bool,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}
