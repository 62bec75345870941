//! Analysis over annotated trees for stalefile.
//!
//! - **Subtree selection** - [`select`] yields the topmost nodes matching a
//!   predicate without descending into them
//! - **Stale directories** - large, long-unaccessed directories that hold no
//!   package-owned files
//! - **Stale packages** - installed packages whose files under the scanned
//!   root were all last accessed long ago
//!
//! ```rust,ignore
//! use stalefile_analyze::{StaleDirFinder, StalePackageFinder};
//! use stalefile_core::NoopResolver;
//! use stalefile_scan::{ScanConfig, TreeBuilder};
//!
//! let tree = TreeBuilder::new().build(&NoopResolver, &ScanConfig::new("/srv")).unwrap();
//!
//! let dirs = StaleDirFinder::new().find(&tree.root);
//! dirs.render_text(&mut std::io::stdout()).unwrap();
//!
//! let packages = StalePackageFinder::new().find(&tree.root.packages);
//! packages.render_text(&mut std::io::stdout()).unwrap();
//! ```

use std::time::{Duration, SystemTime};

mod select;
mod stale_dirs;
mod stale_packages;

pub use select::{Select, select};
pub use stale_dirs::{StaleDirConfig, StaleDirConfigBuilder, StaleDirFinder, StaleDirectory, StaleDirectoryReport};
pub use stale_packages::{
    StalePackage, StalePackageConfig, StalePackageConfigBuilder, StalePackageFinder, StalePackageReport,
    format_timestamp,
};

// Re-export core types
pub use stalefile_core::{PackageMap, TreeNode};

/// One day.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Time elapsed from `then` to `reference`; zero if `then` is in the future.
pub fn age_of(reference: SystemTime, then: SystemTime) -> Duration {
    reference.duration_since(then).unwrap_or(Duration::ZERO)
}

/// Bytes in decimal gigabytes.
pub fn format_gb(bytes: u64) -> f64 {
    bytes as f64 / 1e9
}

/// Format a duration as a human-readable string.
pub fn format_age(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs} seconds")
    } else if secs < 3600 {
        format!("{} minutes", secs / 60)
    } else if secs < 86400 {
        format!("{} hours", secs / 3600)
    } else if secs < 2592000 {
        format!("{} days", secs / 86400)
    } else if secs < 31536000 {
        format!("{} months", secs / 2592000)
    } else {
        format!("{:.1} years", secs as f64 / 31536000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::from_secs(30)), "30 seconds");
        assert_eq!(format_age(Duration::from_secs(7200)), "2 hours");
        assert_eq!(format_age(400 * DAY), "1.1 years");
    }

    #[test]
    fn test_age_of_future_is_zero() {
        let now = SystemTime::now();
        assert_eq!(age_of(now, now + DAY), Duration::ZERO);
        assert_eq!(age_of(now, now - DAY), DAY);
    }

    #[test]
    fn test_format_gb() {
        assert_eq!(format_gb(200_000_000), 0.2);
        assert_eq!(format_gb(0), 0.0);
    }
}
