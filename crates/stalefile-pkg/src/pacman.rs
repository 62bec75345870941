//! Arch Linux pacman backend.
//!
//! Reads the local database directly: every installed package has a
//! directory under `<db>/local/` holding a `desc` file (with `%NAME%`) and a
//! `files` file (with a `%FILES%` section of paths relative to the install
//! root).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use stalefile_core::{PackageId, PackageOwnershipResolver};

use crate::error::ResolverError;
use crate::table::PathTable;

/// Default install root.
pub const DEFAULT_ROOT: &str = "/";

/// Default pacman database path.
pub const DEFAULT_DB: &str = "/var/lib/pacman";

/// Resolver over pacman's local package database.
#[derive(Debug, Clone)]
pub struct PacmanResolver {
    table: PathTable,
    packages: usize,
}

impl PacmanResolver {
    /// Load the system database.
    pub fn open_default() -> Result<Self, ResolverError> {
        Self::open(DEFAULT_ROOT, DEFAULT_DB)
    }

    /// Load the database at `db`, resolving file entries against `root`.
    pub fn open(root: impl AsRef<Path>, db: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let root = root.as_ref();
        let local = db.as_ref().join("local");
        let entries = fs::read_dir(&local).map_err(|e| ResolverError::database(&local, e))?;

        let mut table = PathTable::new();
        let mut packages = 0;
        for entry in entries {
            let entry = entry.map_err(|e| ResolverError::database(&local, e))?;
            let dir = entry.path();
            if !dir.is_dir() {
                continue;
            }

            let desc = fs::read_to_string(dir.join("desc")).map_err(|e| ResolverError::database(&dir, e))?;
            let Some(name) = section(&desc, "%NAME%").next() else {
                warn!(path = %dir.display(), "package entry without %NAME%");
                continue;
            };
            let name = PackageId::from(name);

            // Packages that install no files have no `files` entry.
            let files = match fs::read_to_string(dir.join("files")) {
                Ok(files) => files,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
                Err(err) => return Err(ResolverError::database(dir.join("files"), err)),
            };
            for file in section(&files, "%FILES%") {
                table.insert(install_path(root, file), &name);
            }
            packages += 1;
        }

        if table.is_empty() {
            warn!(db = %local.display(), "pacman database lists no files");
        }
        debug!(packages, paths = table.len(), db = %local.display(), "loaded pacman database");
        Ok(Self { table, packages })
    }

    /// Number of installed packages read from the database.
    pub fn package_count(&self) -> usize {
        self.packages
    }
}

impl PackageOwnershipResolver for PacmanResolver {
    fn owners_of(&self, path: &Path) -> &[PackageId] {
        self.table.owners_of(path)
    }

    fn name(&self) -> &str {
        "pacman"
    }
}

/// Lines of the `header` section, up to the next blank line.
fn section<'a>(text: &'a str, header: &str) -> impl Iterator<Item = &'a str> + use<'a> {
    let mut lines = text.lines();
    let found = lines.by_ref().any(|line| line.trim_end() == header);
    lines
        .take_while(move |line| found && !line.trim().is_empty())
        .map(str::trim_end)
}

/// Database entries are relative; directories carry a trailing slash.
fn install_path(root: &Path, entry: &str) -> PathBuf {
    root.join(entry.trim_end_matches('/'))
}
