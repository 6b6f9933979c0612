//! Error types for catalog operations.

use thiserror::Error;

/// Errors that can occur while reading the library snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A query against the snapshot failed.
    #[error("catalog query failed: {0}")]
    Database(#[from] sqlx::Error),
}
