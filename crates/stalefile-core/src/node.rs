//! Annotated tree node types.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::packages::PackageMap;

/// Access time used for nodes that were never accessed or carry no content.
pub const EPOCH: SystemTime = UNIX_EPOCH;

/// Type of file system node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link (never followed).
    Symlink,
    /// Other file types (sockets, FIFOs, devices).
    Other,
}

impl NodeKind {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, NodeKind::Symlink)
    }
}

/// A single path in the scanned tree, annotated with rolled-up values.
///
/// For directories `accessed`, `size` and `packages` aggregate over all
/// children: latest access time, total bytes, and per-package latest access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Absolute path of this node.
    pub path: PathBuf,

    /// Node type.
    pub kind: NodeKind,

    /// Most recent access time in this subtree ([`EPOCH`] if none).
    pub accessed: SystemTime,

    /// Total bytes of regular files in this subtree.
    pub size: u64,

    /// Children in enumeration order (directories only).
    pub children: Vec<TreeNode>,

    /// Latest access time per owning package.
    pub packages: PackageMap,
}

impl TreeNode {
    /// Create a regular file leaf.
    pub fn new_file(path: impl Into<PathBuf>, size: u64, accessed: SystemTime, packages: PackageMap) -> Self {
        Self {
            path: path.into(),
            kind: NodeKind::File,
            accessed,
            size,
            children: Vec::new(),
            packages,
        }
    }

    /// Create an empty directory; fold children in with [`TreeNode::push_child`].
    pub fn new_directory(path: impl Into<PathBuf>) -> Self {
        Self::empty(path, NodeKind::Directory)
    }

    /// Create a symlink leaf. The target is never inspected.
    pub fn new_symlink(path: impl Into<PathBuf>) -> Self {
        Self::empty(path, NodeKind::Symlink)
    }

    /// Create a leaf for sockets, FIFOs, devices and unreadable entries.
    pub fn new_other(path: impl Into<PathBuf>) -> Self {
        Self::empty(path, NodeKind::Other)
    }

    fn empty(path: impl Into<PathBuf>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            accessed: EPOCH,
            size: 0,
            children: Vec::new(),
            packages: PackageMap::new(),
        }
    }

    /// Aggregate a child into this node and append it.
    pub fn push_child(&mut self, child: TreeNode) {
        self.accessed = self.accessed.max(child.accessed);
        self.size += child.size;
        self.packages.merge(child.packages.clone());
        self.children.push(child);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// True when no file below this node belongs to an installed package.
    pub fn is_unowned(&self) -> bool {
        self.packages.is_empty()
    }

    /// Count of regular files in this subtree.
    pub fn file_count(&self) -> u64 {
        match self.kind {
            NodeKind::File => 1,
            NodeKind::Directory => self.children.iter().map(TreeNode::file_count).sum(),
            _ => 0,
        }
    }
}
