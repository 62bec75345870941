//! Per-package last-access maps and the merge used to fold them.

use std::collections::BTreeMap;
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Name of an installed package as reported by the package database.
pub type PackageId = CompactString;

/// Merge `other` into `base`, combining values for keys present on both sides.
///
/// Keys only present on one side keep that side's value. With a commutative
/// and associative `combine` (such as `max`) the result does not depend on the
/// order in which maps are folded.
pub fn merge_with<K, V, F>(mut base: BTreeMap<K, V>, other: BTreeMap<K, V>, combine: F) -> BTreeMap<K, V>
where
    K: Ord,
    F: Fn(V, V) -> V,
{
    for (key, value) in other {
        let merged = match base.remove(&key) {
            Some(current) => combine(current, value),
            None => value,
        };
        base.insert(key, merged);
    }
    base
}

/// Latest access time observed for each package under a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageMap(BTreeMap<PackageId, SystemTime>);

impl PackageMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute a single file's access time to each of its owners.
    pub fn from_owners<'a, I>(owners: I, accessed: SystemTime) -> Self
    where
        I: IntoIterator<Item = &'a PackageId>,
    {
        let mut map = Self::new();
        for owner in owners {
            map.record(owner.clone(), accessed);
        }
        map
    }

    /// Record an access, keeping the most recent time for the package.
    pub fn record(&mut self, package: impl Into<PackageId>, accessed: SystemTime) {
        let slot = self.0.entry(package.into()).or_insert(accessed);
        *slot = (*slot).max(accessed);
    }

    /// Fold another map into this one, keeping the later timestamp per package.
    pub fn merge(&mut self, other: PackageMap) {
        let base = std::mem::take(&mut self.0);
        self.0 = merge_with(base, other.0, SystemTime::max);
    }

    /// Latest recorded access for a package.
    pub fn get(&self, package: &str) -> Option<SystemTime> {
        self.0.get(package).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate packages in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&PackageId, SystemTime)> {
        self.0.iter().map(|(name, time)| (name, *time))
    }
}

impl FromIterator<(PackageId, SystemTime)> for PackageMap {
    fn from_iter<T: IntoIterator<Item = (PackageId, SystemTime)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (package, accessed) in iter {
            map.record(package, accessed);
        }
        map
    }
}
