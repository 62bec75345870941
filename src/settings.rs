//! Persistent defaults read from the user's config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Defaults applied when the matching command-line flag is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    /// Age threshold for stale directories, in days.
    pub days: Option<u64>,
    /// Age threshold for stale packages, in days.
    pub pkg_days: Option<u64>,
    /// Minimum size for stale directories, in bytes.
    pub size: Option<f64>,
    /// Package backend name.
    pub package_manager: Option<String>,
    /// Ignore-list file.
    pub ignore_file: Option<PathBuf>,
    /// Extra ignore paths.
    pub ignore: Vec<PathBuf>,
    /// Whether package-owned directories are excluded from the report.
    pub require_unowned: Option<bool>,
}

impl Settings {
    /// Get the config file path.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stalefile").join("settings.toml"))
    }

    /// Load settings from disk, or return defaults.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Read settings from `path`; `None` if absent or unreadable.
    pub fn load_from(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => {
                debug!(path = %path.display(), "loaded settings");
                Some(settings)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring malformed settings file");
                None
            }
        }
    }
}
