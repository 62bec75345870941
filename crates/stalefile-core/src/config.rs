//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Which path is tested against the ignore patterns while expanding a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreMode {
    /// Test each child before entering it; ignored children are left out.
    #[default]
    Child,
    /// Test the directory being expanded; when it matches, none of its
    /// children are recorded and the directory remains as an empty node.
    Parent,
}

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Path prefixes whose contents are excluded from aggregation.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<PathBuf>,

    /// How ignore patterns are applied.
    #[builder(default)]
    #[serde(default)]
    pub ignore_mode: IgnoreMode,
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if let Some(ref patterns) = self.ignore_patterns {
            if patterns.iter().any(|p| p.as_os_str().is_empty()) {
                return Err("Ignore patterns cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_patterns: Vec::new(),
            ignore_mode: IgnoreMode::default(),
        }
    }

    /// Check whether `path` lies at or below one of the ignore patterns.
    ///
    /// Matching is component-wise, so `/var/log` covers `/var/log/syslog`
    /// but not `/var/logs`.
    pub fn should_ignore(&self, path: &Path) -> bool {
        self.ignore_patterns.iter().any(|pattern| path.starts_with(pattern))
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .ignore_patterns(vec![PathBuf::from("/home/user/.cache")])
            .ignore_mode(IgnoreMode::Parent)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert_eq!(config.ignore_patterns.len(), 1);
        assert_eq!(config.ignore_mode, IgnoreMode::Parent);
    }

    #[test]
    fn test_config_builder_requires_root() {
        assert!(ScanConfig::builder().build().is_err());
        assert!(ScanConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_config_builder_rejects_empty_pattern() {
        let result = ScanConfig::builder()
            .root("/")
            .ignore_patterns(vec![PathBuf::new()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_should_ignore_is_prefix_by_component() {
        let config = ScanConfig::builder()
            .root("/")
            .ignore_patterns(vec![PathBuf::from("/var/log")])
            .build()
            .unwrap();

        assert!(config.should_ignore(Path::new("/var/log")));
        assert!(config.should_ignore(Path::new("/var/log/syslog")));
        assert!(!config.should_ignore(Path::new("/var/logs")));
        assert!(!config.should_ignore(Path::new("/var")));
    }

    #[test]
    fn test_default_mode_is_child() {
        let config = ScanConfig::new("/tmp");
        assert_eq!(config.ignore_mode, IgnoreMode::Child);
        assert!(!config.should_ignore(Path::new("/tmp")));
    }
}
