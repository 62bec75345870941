//! Error types for package database backends.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while selecting or loading a package backend.
#[derive(Debug, Error)]
pub enum ResolverError {
    /// No backend is registered under this name.
    #[error("unknown backend: {name}")]
    UnknownBackend { name: String },

    /// The package database could not be read.
    #[error("cannot read package database at {path}: {source}")]
    Database {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolverError {
    pub(crate) fn database(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Database {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_backend_message() {
        let err = ResolverError::UnknownBackend { name: "rpm".into() };
        assert_eq!(err.to_string(), "unknown backend: rpm");
    }
}
