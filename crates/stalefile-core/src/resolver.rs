//! Package ownership lookup seam.

use std::path::Path;

use crate::packages::PackageId;

/// Resolves a filesystem path to the packages that installed it.
///
/// A path nobody owns is the normal case and yields an empty slice.
pub trait PackageOwnershipResolver {
    /// Packages that installed `path`.
    fn owners_of(&self, path: &Path) -> &[PackageId];

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

/// Resolver used when no package database is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopResolver;

impl PackageOwnershipResolver for NoopResolver {
    fn owners_of(&self, _path: &Path) -> &[PackageId] {
        &[]
    }

    fn name(&self) -> &str {
        "none"
    }
}

impl<R: PackageOwnershipResolver + ?Sized> PackageOwnershipResolver for Box<R> {
    fn owners_of(&self, path: &Path) -> &[PackageId] {
        (**self).owners_of(path)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_resolver_owns_nothing() {
        let resolver = NoopResolver;
        assert!(resolver.owners_of(Path::new("/usr/bin/ls")).is_empty());
        assert_eq!(resolver.name(), "none");
    }

    #[test]
    fn test_boxed_resolver_delegates() {
        let resolver: Box<dyn PackageOwnershipResolver> = Box::new(NoopResolver);
        assert!(resolver.owners_of(Path::new("/etc")).is_empty());
    }
}
