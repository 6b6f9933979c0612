//! Database snapshotting and read-only access.
//!
//! This module provides SQLite connectivity for the Zotero library with:
//! - Point-in-time snapshotting of the database file
//! - Read-only pool over the snapshot
//! - Fail-fast schema verification
//!
//! The live `zotero.sqlite` may be held open by a running Zotero instance.
//! Rather than contend for its locks, the file is copied once at run start
//! and all queries go against the copy.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::catalog::TITLE_FIELD;

/// The pipeline is fully sequential; one connection is enough.
const MAX_CONNECTIONS: u32 = 1;

/// Tables the mirror queries. Verified up front so a schema drift fails
/// with a clear error instead of deep inside a join.
const REQUIRED_TABLES: [&str; 7] = [
    "collections",
    "items",
    "collectionItems",
    "itemAttachments",
    "itemData",
    "itemDataValues",
    "fields",
];

/// Database-related errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// The source database file does not exist.
    #[error("source database not found at {path}")]
    SourceMissing {
        /// Path that was expected to hold `zotero.sqlite`.
        path: PathBuf,
    },

    /// Copying the source database to the snapshot location failed.
    #[error("failed to snapshot database {path}: {source}")]
    Snapshot {
        /// The source database path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or query the snapshot.
    #[error("failed to open database snapshot: {0}")]
    Connection(#[from] sqlx::Error),

    /// The snapshot does not look like a Zotero database.
    #[error("unexpected database schema: missing {missing}")]
    SchemaMismatch {
        /// Human-readable description of what was absent.
        missing: String,
    },
}

/// Read-only handle to a point-in-time snapshot of the Zotero database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Copies `source` to `snapshot_path` and opens the copy read-only.
    ///
    /// The schema is verified before the handle is returned, so all later
    /// query failures indicate data problems rather than a wrong file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::SourceMissing`] if `source` does not exist,
    /// [`DbError::Snapshot`] if the copy fails, [`DbError::Connection`] if
    /// the snapshot cannot be opened, and [`DbError::SchemaMismatch`] if the
    /// expected tables or fields are absent.
    #[instrument(skip_all, fields(source = %source.display()))]
    pub async fn snapshot(source: &Path, snapshot_path: &Path) -> Result<Self, DbError> {
        if !source.is_file() {
            return Err(DbError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        std::fs::copy(source, snapshot_path).map_err(|io_error| DbError::Snapshot {
            path: source.to_path_buf(),
            source: io_error,
        })?;
        debug!(snapshot = %snapshot_path.display(), "database snapshot written");

        let db_url = format!("sqlite:{}?mode=ro", snapshot_path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(&db_url)
            .await?;

        let db = Self { pool };
        db.verify_schema().await?;
        Ok(db)
    }

    /// Checks that the required tables and the title field exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::SchemaMismatch`] naming the missing tables or
    /// field, or [`DbError::Connection`] if the probe queries fail.
    #[instrument(skip(self))]
    pub async fn verify_schema(&self) -> Result<(), DbError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table'")
                .fetch_all(&self.pool)
                .await?;
        let present: HashSet<&str> = rows.iter().map(|(name,)| name.as_str()).collect();

        let missing: Vec<&str> = REQUIRED_TABLES
            .iter()
            .copied()
            .filter(|table| !present.contains(table))
            .collect();
        if !missing.is_empty() {
            return Err(DbError::SchemaMismatch {
                missing: format!("table(s) {}", missing.join(", ")),
            });
        }

        let title_field: Option<(i64,)> =
            sqlx::query_as("SELECT fieldID FROM fields WHERE fieldName = ?")
                .bind(TITLE_FIELD)
                .fetch_optional(&self.pool)
                .await?;
        if title_field.is_none() {
            return Err(DbError::SchemaMismatch {
                missing: format!("'{TITLE_FIELD}' row in fields"),
            });
        }

        Ok(())
    }

    /// Returns a reference to the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Gracefully closes all connections in the pool.
    #[instrument(skip(self))]
    pub async fn close(self) {
        self.pool.close().await;
    }
}
