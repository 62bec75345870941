//! File system tree builder for stalefile.
//!
//! This crate walks a root path depth-first and produces a [`ScanTree`] whose
//! nodes carry rolled-up access time, size and package ownership.
//!
//! # Overview
//!
//! - **Symlinks are never followed**; they become empty leaves
//! - **Permission errors are recovered** per directory and kept as warnings
//! - **Progress updates** via a broadcast channel
//! - **Cancellation** checked before each directory is expanded
//!
//! # Example
//!
//! ```rust,no_run
//! use stalefile_core::NoopResolver;
//! use stalefile_scan::{ScanConfig, TreeBuilder};
//!
//! let config = ScanConfig::new("/path/to/scan");
//! let tree = TreeBuilder::new().build(&NoopResolver, &config).unwrap();
//!
//! println!("Total size: {} bytes", tree.total_size());
//! println!("Total files: {}", tree.stats.total_files);
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use stalefile_scan::TreeBuilder;
//!
//! let builder = TreeBuilder::new();
//! let mut progress_rx = builder.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Scanned {} files", progress.files_scanned);
//!     }
//! });
//! ```

mod builder;
mod progress;

pub use builder::TreeBuilder;
pub use progress::{ProgressReceiver, ScanProgress};

// Re-export core types for convenience
pub use stalefile_core::{
    IgnoreMode, NodeKind, ScanConfig, ScanError, ScanTree, ScanWarning, TreeNode, TreeStats, WarningKind,
};
pub use tokio_util::sync::CancellationToken;
