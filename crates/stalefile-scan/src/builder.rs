//! Recursive, symlink-safe tree builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stalefile_core::{
    EPOCH, IgnoreMode, PackageMap, PackageOwnershipResolver, ScanConfig, ScanError, ScanTree, ScanWarning, TreeNode,
    TreeStats,
};

use crate::progress::{ProgressReceiver, ScanProgress};

/// Files between two progress updates.
const PROGRESS_INTERVAL: u64 = 1000;

/// Builds an annotated [`ScanTree`] with a single depth-first pass.
pub struct TreeBuilder {
    progress_tx: broadcast::Sender<ScanProgress>,
    cancel: CancellationToken,
}

impl TreeBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            progress_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop the walk with [`ScanError::Interrupted`] once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> ProgressReceiver {
        self.progress_tx.subscribe()
    }

    /// Walk `config.root` and aggregate it into a tree.
    ///
    /// The root must exist. Problems below the root are recorded as warnings
    /// on the returned tree instead of failing the scan.
    pub fn build<R>(&self, resolver: &R, config: &ScanConfig) -> Result<ScanTree, ScanError>
    where
        R: PackageOwnershipResolver + ?Sized,
    {
        let start = Instant::now();
        let root_path = std::path::absolute(&config.root).map_err(|e| ScanError::io(&config.root, e))?;
        fs::symlink_metadata(&root_path).map_err(|e| ScanError::io(&root_path, e))?;

        info!(root = %root_path.display(), backend = resolver.name(), "building tree");

        let mut walk = Walk::new(resolver, config, &self.progress_tx, &self.cancel, start);
        let root = walk.node(root_path, 0)?;
        walk.send_progress(&root.path, true);

        let Walk { stats, warnings, .. } = walk;
        let scan_duration = start.elapsed();
        info!(
            files = stats.total_files,
            dirs = stats.total_dirs,
            warnings = warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "tree built"
        );

        Ok(ScanTree::new(root, config.clone(), stats, scan_duration, warnings))
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// State threaded through one traversal.
struct Walk<'a, R: ?Sized> {
    resolver: &'a R,
    config: &'a ScanConfig,
    progress_tx: &'a broadcast::Sender<ScanProgress>,
    cancel: &'a CancellationToken,
    start: Instant,
    stats: TreeStats,
    warnings: Vec<ScanWarning>,
}

impl<'a, R> Walk<'a, R>
where
    R: PackageOwnershipResolver + ?Sized,
{
    fn new(
        resolver: &'a R,
        config: &'a ScanConfig,
        progress_tx: &'a broadcast::Sender<ScanProgress>,
        cancel: &'a CancellationToken,
        start: Instant,
    ) -> Self {
        Self {
            resolver,
            config,
            progress_tx,
            cancel,
            start,
            stats: TreeStats::new(),
            warnings: Vec::new(),
        }
    }

    /// Classify `path` without following symlinks and build its node.
    fn node(&mut self, path: PathBuf, depth: u32) -> Result<TreeNode, ScanError> {
        let metadata = match fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot stat entry");
                self.warnings.push(ScanWarning::metadata(&path, &err));
                self.stats.record_other();
                return Ok(TreeNode::new_other(path));
            }
        };

        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            self.stats.record_symlink();
            Ok(TreeNode::new_symlink(path))
        } else if file_type.is_dir() {
            self.directory(path, depth)
        } else if file_type.is_file() {
            let accessed = metadata.accessed().unwrap_or(EPOCH);
            let size = metadata.len();
            let packages = PackageMap::from_owners(self.resolver.owners_of(&path), accessed);

            self.stats.record_file(size, depth);
            if self.stats.total_files % PROGRESS_INTERVAL == 0 {
                self.send_progress(&path, false);
            }
            Ok(TreeNode::new_file(path, size, accessed, packages))
        } else {
            self.stats.record_other();
            Ok(TreeNode::new_other(path))
        }
    }

    fn directory(&mut self, path: PathBuf, depth: u32) -> Result<TreeNode, ScanError> {
        if self.cancel.is_cancelled() {
            return Err(ScanError::Interrupted);
        }
        self.stats.record_dir(depth);

        let mut node = TreeNode::new_directory(path);
        if self.config.ignore_mode == IgnoreMode::Parent && self.config.should_ignore(&node.path) {
            debug!(path = %node.path.display(), "ignored directory, contents skipped");
            return Ok(node);
        }

        match fs::read_dir(&node.path) {
            Ok(entries) => {
                let entries = entries.map(|entry| entry.map(|e| e.path()));
                self.expand(&mut node, entries, depth)?;
            }
            Err(err) => self.listing_failed(&node.path, &err),
        }
        Ok(node)
    }

    /// Fold enumerated children into `node`.
    ///
    /// The first listing error ends the enumeration; children gathered before
    /// it are kept.
    fn expand<I>(&mut self, node: &mut TreeNode, entries: I, depth: u32) -> Result<(), ScanError>
    where
        I: Iterator<Item = io::Result<PathBuf>>,
    {
        for entry in entries {
            let child = match entry {
                Ok(path) => path,
                Err(err) => {
                    self.listing_failed(&node.path, &err);
                    break;
                }
            };

            if self.config.ignore_mode == IgnoreMode::Child && self.config.should_ignore(&child) {
                debug!(path = %child.display(), "ignored");
                continue;
            }

            let sub = self.node(child, depth + 1)?;
            node.push_child(sub);
        }
        Ok(())
    }

    fn listing_failed(&mut self, path: &Path, err: &io::Error) {
        warn!(path = %path.display(), error = %err, "directory listing stopped");
        self.warnings.push(ScanWarning::listing(path, err));
    }

    fn send_progress(&self, current: &Path, finished: bool) {
        let _ = self.progress_tx.send(ScanProgress {
            files_scanned: self.stats.total_files,
            dirs_scanned: self.stats.total_dirs,
            bytes_scanned: self.stats.total_size,
            current_path: current.to_path_buf(),
            errors_count: self.warnings.len() as u64,
            elapsed: self.start.elapsed(),
            finished,
        });
    }
}
