//! Package database backends for stalefile.
//!
//! Each backend loads its database once into a path table and implements
//! [`PackageOwnershipResolver`] over it:
//!
//! - `none` - owns nothing ([`NoopResolver`])
//! - `pacman` - Arch Linux local database ([`PacmanResolver`])
//! - `dpkg` - Debian `info/*.list` files ([`DpkgResolver`])
//!
//! ```rust,no_run
//! use stalefile_pkg::PackageManagerKind;
//!
//! let kind = PackageManagerKind::parse("pacman").unwrap();
//! let resolver = kind.open().unwrap();
//! let owners = resolver.owners_of(std::path::Path::new("/usr/bin/bash"));
//! ```

mod backend;
mod dpkg;
mod error;
mod pacman;
mod table;

pub use backend::PackageManagerKind;
pub use dpkg::DpkgResolver;
pub use error::ResolverError;
pub use pacman::PacmanResolver;
pub use table::PathTable;

pub use stalefile_core::{NoopResolver, PackageId, PackageOwnershipResolver};
