//! Path to owning-packages lookup table shared by the backends.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use stalefile_core::PackageId;

/// Owners per installed path, built once from a package database.
#[derive(Debug, Clone, Default)]
pub struct PathTable {
    owners: HashMap<PathBuf, Vec<PackageId>>,
}

impl PathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `package` installed `path`. Duplicates are dropped.
    pub fn insert(&mut self, path: PathBuf, package: &PackageId) {
        let owners = self.owners.entry(path).or_default();
        if !owners.contains(package) {
            owners.push(package.clone());
        }
    }

    pub fn owners_of(&self, path: &Path) -> &[PackageId] {
        self.owners.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct paths.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
