//! Error types for the mirror pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::mirror::paths::PathError;

/// Errors that abort a mirror run.
///
/// Per-attachment problems (missing source file, unusable path, destination
/// already satisfied) are not errors; they are skipped and counted in
/// [`crate::mirror::MirrorStats`].
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Reading the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A collection's ancestry could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),

    /// Filesystem error during tree rebuild or attachment placement.
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path being written or inspected when the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl MirrorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
