//! Installed packages whose files have not been accessed recently.

use std::io::{self, Write};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stalefile_core::{PackageId, PackageMap};

use crate::{DAY, age_of};

/// Configuration for stale package detection.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct StalePackageConfig {
    /// Reference time for age calculations (default: now).
    #[builder(default = "SystemTime::now()")]
    pub reference_time: SystemTime,

    /// A package is stale when its newest file access is older than this.
    #[builder(default = "365 * DAY")]
    pub age_threshold: Duration,
}

impl Default for StalePackageConfig {
    fn default() -> Self {
        Self {
            reference_time: SystemTime::now(),
            age_threshold: 365 * DAY,
        }
    }
}

impl StalePackageConfig {
    pub fn builder() -> StalePackageConfigBuilder {
        StalePackageConfigBuilder::default()
    }
}

/// A package none of whose scanned files were accessed recently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StalePackage {
    /// Package name.
    pub name: PackageId,
    /// Latest access of any of its files under the scanned root.
    pub last_accessed: SystemTime,
    pub age: Duration,
}

/// Stale packages in name order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StalePackageReport {
    pub packages: Vec<StalePackage>,
}

impl StalePackageReport {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Write `<name> <local timestamp>` per package.
    pub fn render_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for package in &self.packages {
            writeln!(out, "{} {}", package.name, format_timestamp(package.last_accessed))?;
        }
        Ok(())
    }
}

/// Finds stale packages in an aggregated package map.
///
/// Only files below the scanned root count, so packages installed entirely
/// outside it never appear.
pub struct StalePackageFinder {
    config: StalePackageConfig,
}

impl StalePackageFinder {
    pub fn new() -> Self {
        Self {
            config: StalePackageConfig::default(),
        }
    }

    pub fn with_config(config: StalePackageConfig) -> Self {
        Self { config }
    }

    /// Report packages whose latest access is older than the threshold.
    pub fn find(&self, packages: &PackageMap) -> StalePackageReport {
        let packages: Vec<StalePackage> = packages
            .iter()
            .filter_map(|(name, last_accessed)| {
                let age = age_of(self.config.reference_time, last_accessed);
                (age > self.config.age_threshold).then(|| StalePackage {
                    name: name.clone(),
                    last_accessed,
                    age,
                })
            })
            .collect();

        debug!(matches = packages.len(), "stale packages selected");
        StalePackageReport { packages }
    }
}

impl Default for StalePackageFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a timestamp in local time.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_old_packages_reported() {
        let now = SystemTime::now();
        let mut packages = PackageMap::new();
        packages.record("fresh", now - 10 * DAY);
        packages.record("old", now - 400 * DAY);
        packages.record("edge", now - 365 * DAY);

        let finder = StalePackageFinder::with_config(
            StalePackageConfig::builder().reference_time(now).build().unwrap(),
        );
        let report = finder.find(&packages);

        let names: Vec<&str> = report.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["old"]);
        assert_eq!(report.packages[0].age, 400 * DAY);
    }

    #[test]
    fn test_render_text_lists_name_and_time() {
        let time = SystemTime::now() - 400 * DAY;
        let report = StalePackageReport {
            packages: vec![StalePackage {
                name: "foo".into(),
                last_accessed: time,
                age: 400 * DAY,
            }],
        };
        let mut out = Vec::new();
        report.render_text(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, format!("foo {}\n", format_timestamp(time)));
        assert_eq!(format_timestamp(time).len(), "2024-01-01 00:00:00".len());
    }
}
