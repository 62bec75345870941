//! Core types and traits for stalefile.
//!
//! This crate provides the fundamental data structures shared by the scanner
//! and the report layer: annotated tree nodes, per-package access maps, the
//! package ownership seam, configuration and error types.

mod config;
mod error;
mod node;
mod packages;
mod resolver;
mod tree;

pub use config::{IgnoreMode, ScanConfig, ScanConfigBuilder, ScanConfigBuilderError};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use node::{NodeKind, TreeNode, EPOCH};
pub use packages::{PackageId, PackageMap, merge_with};
pub use resolver::{NoopResolver, PackageOwnershipResolver};
pub use tree::{ScanTree, TreeStats};
