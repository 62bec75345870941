//! Debian dpkg backend.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use stalefile_core::{PackageId, PackageOwnershipResolver};

use crate::error::ResolverError;
use crate::table::PathTable;

/// Default dpkg administrative directory.
pub const DEFAULT_ADMIN_DIR: &str = "/var/lib/dpkg";

/// Resolver over the `info/<package>[:arch].list` files of dpkg.
#[derive(Debug, Clone)]
pub struct DpkgResolver {
    table: PathTable,
    packages: usize,
}

impl DpkgResolver {
    pub fn open_default() -> Result<Self, ResolverError> {
        Self::open(DEFAULT_ADMIN_DIR)
    }

    /// Load every `.list` file under `<admin_dir>/info`.
    pub fn open(admin_dir: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let info = admin_dir.as_ref().join("info");
        let entries = fs::read_dir(&info).map_err(|e| ResolverError::database(&info, e))?;

        let mut table = PathTable::new();
        let mut packages = 0;
        for entry in entries {
            let path = entry.map_err(|e| ResolverError::database(&info, e))?.path();
            let Some(name) = package_name(&path) else {
                continue;
            };

            let list = fs::read_to_string(&path).map_err(|e| ResolverError::database(&path, e))?;
            for line in list.lines().map(str::trim_end) {
                // Every list starts with "/." for the root itself.
                if line.is_empty() || line == "/." {
                    continue;
                }
                table.insert(PathBuf::from(line), &name);
            }
            packages += 1;
        }

        if table.is_empty() {
            warn!(info = %info.display(), "dpkg database lists no files");
        }
        debug!(packages, paths = table.len(), info = %info.display(), "loaded dpkg database");
        Ok(Self { table, packages })
    }

    pub fn package_count(&self) -> usize {
        self.packages
    }
}

impl PackageOwnershipResolver for DpkgResolver {
    fn owners_of(&self, path: &Path) -> &[PackageId] {
        self.table.owners_of(path)
    }

    fn name(&self) -> &str {
        "dpkg"
    }
}

/// `libc6:amd64.list` -> `libc6`; non-list files yield `None`.
fn package_name(path: &Path) -> Option<PackageId> {
    if path.extension()? != "list" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let name = stem.split_once(':').map_or(stem, |(name, _arch)| name);
    Some(PackageId::from(name))
}
