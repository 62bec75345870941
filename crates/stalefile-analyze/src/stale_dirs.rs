//! Large directories nobody has accessed recently.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use derive_builder::Builder;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stalefile_core::TreeNode;

use crate::select::select;
use crate::{DAY, age_of, format_gb};

/// Configuration for stale directory detection.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct StaleDirConfig {
    /// Reference time for age calculations (default: now).
    #[builder(default = "SystemTime::now()")]
    pub reference_time: SystemTime,

    /// A directory is stale when its newest access is older than this.
    #[builder(default = "365 * DAY")]
    pub age_threshold: Duration,

    /// Only directories strictly larger than this are reported.
    #[builder(default = "100_000_000")]
    pub min_size: u64,

    /// Skip directories holding any file that belongs to a package.
    #[builder(default = "true")]
    pub require_unowned: bool,
}

impl Default for StaleDirConfig {
    fn default() -> Self {
        Self {
            reference_time: SystemTime::now(),
            age_threshold: 365 * DAY,
            min_size: 100_000_000,
            require_unowned: true,
        }
    }
}

impl StaleDirConfig {
    /// Create a new config builder.
    pub fn builder() -> StaleDirConfigBuilder {
        StaleDirConfigBuilder::default()
    }
}

/// A directory selected as stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleDirectory {
    /// Path to the directory.
    pub path: PathBuf,
    /// Total size of the directory.
    pub size: u64,
    /// Most recent access anywhere below it.
    pub last_accessed: SystemTime,
    /// Time since that access.
    pub age: Duration,
}

impl fmt::Display for StaleDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} GB", self.path.display(), format_gb(self.size))
    }
}

/// Stale directories, largest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaleDirectoryReport {
    /// Matched directories sorted by size descending.
    pub directories: Vec<StaleDirectory>,
    /// Sum of all matched sizes.
    pub total_size: u64,
}

impl StaleDirectoryReport {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    /// Write `<path> <size> GB` per directory, then the total.
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for dir in &self.directories {
            writeln!(out, "{dir}")?;
        }
        writeln!(out, "{} GB", format_gb(self.total_size))
    }
}

/// Finds stale directories in a tree.
pub struct StaleDirFinder {
    config: StaleDirConfig,
}

impl StaleDirFinder {
    /// Create a new finder with default config.
    pub fn new() -> Self {
        Self {
            config: StaleDirConfig::default(),
        }
    }

    /// Create a new finder with custom config.
    pub fn with_config(config: StaleDirConfig) -> Self {
        Self { config }
    }

    /// Whether `node` is reported as a whole.
    pub fn is_stale(&self, node: &TreeNode) -> bool {
        node.is_dir()
            && age_of(self.config.reference_time, node.accessed) > self.config.age_threshold
            && node.size > self.config.min_size
            && (!self.config.require_unowned || node.is_unowned())
    }

    /// Select the topmost stale directories under `root`.
    pub fn find(&self, root: &TreeNode) -> StaleDirectoryReport {
        let directories: Vec<StaleDirectory> = select(root, |node| self.is_stale(node))
            .map(|node| StaleDirectory {
                path: node.path.clone(),
                size: node.size,
                last_accessed: node.accessed,
                age: age_of(self.config.reference_time, node.accessed),
            })
            .sorted_by(|a, b| b.size.cmp(&a.size))
            .collect();
        let total_size = directories.iter().map(|d| d.size).sum();

        debug!(matches = directories.len(), total_size, "stale directories selected");
        StaleDirectoryReport {
            directories,
            total_size,
        }
    }
}

impl Default for StaleDirFinder {
    fn default() -> Self {
        Self::new()
    }
}
