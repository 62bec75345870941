//! Backend selection by name.

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::debug;

use stalefile_core::{NoopResolver, PackageOwnershipResolver};

use crate::dpkg::DpkgResolver;
use crate::error::ResolverError;
use crate::pacman::PacmanResolver;

/// Supported package database backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PackageManagerKind {
    /// No package database; nothing is owned.
    #[default]
    #[strum(serialize = "none")]
    Noop,
    /// Arch Linux pacman.
    Pacman,
    /// Debian dpkg.
    Dpkg,
}

impl PackageManagerKind {
    /// Look up a backend by name.
    pub fn parse(name: &str) -> Result<Self, ResolverError> {
        Self::from_str(name).map_err(|_| ResolverError::UnknownBackend { name: name.to_string() })
    }

    /// Names accepted by [`PackageManagerKind::parse`].
    pub fn names() -> Vec<String> {
        Self::iter().map(|kind| kind.to_string()).collect()
    }

    /// Load the backend from its default system location.
    pub fn open(self) -> Result<Box<dyn PackageOwnershipResolver>, ResolverError> {
        let resolver: Box<dyn PackageOwnershipResolver> = match self {
            Self::Noop => Box::new(NoopResolver),
            Self::Pacman => Box::new(PacmanResolver::open_default()?),
            Self::Dpkg => Box::new(DpkgResolver::open_default()?),
        };
        debug!(backend = resolver.name(), "package backend ready");
        Ok(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(PackageManagerKind::parse("none").unwrap(), PackageManagerKind::Noop);
        assert_eq!(PackageManagerKind::parse("pacman").unwrap(), PackageManagerKind::Pacman);
        assert_eq!(PackageManagerKind::parse("dpkg").unwrap(), PackageManagerKind::Dpkg);
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = PackageManagerKind::parse("portage").unwrap_err();
        assert!(matches!(err, ResolverError::UnknownBackend { ref name } if name == "portage"));
        assert_eq!(err.to_string(), "unknown backend: portage");
    }

    #[test]
    fn test_names_round_trip() {
        assert_eq!(PackageManagerKind::names(), vec!["none", "pacman", "dpkg"]);
    }

    #[test]
    fn test_open_none() {
        let resolver = PackageManagerKind::Noop.open().unwrap();
        assert_eq!(resolver.name(), "none");
        assert!(resolver.owners_of(Path::new("/usr/bin/ls")).is_empty());
    }
}
