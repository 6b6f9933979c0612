//! Catalog module: read operations against the library snapshot.
//!
//! This module exposes the three reads the mirror pipeline needs:
//! - [`Catalog::load_collections`] - the collection tree for one library
//! - [`Catalog::load_items`] - every (collection, item, title) pairing
//! - [`Catalog::load_attachments`] - an item's PDF attachments, on demand
//!
//! Nothing is cached beyond the life of one run; attachments are queried per
//! item as the pipeline reaches it.
//!
//! # Schema assumptions
//!
//! The numeric attachment type code and the `title` field name are internal
//! to Zotero's schema and are isolated here as named constants. They are
//! cross-checked at startup by [`crate::db::Database::verify_schema`].

mod error;
mod types;

pub use error::CatalogError;
pub use types::{AttachmentRef, CatalogItem, Collection};

use std::collections::HashMap;

use tracing::instrument;

use crate::db::Database;

/// Zotero library to mirror by default. Library 1 is the user's own library;
/// group libraries get higher ids.
pub const USER_LIBRARY_ID: i64 = 1;

/// `itemTypeID` Zotero assigns to attachment items.
pub const ATTACHMENT_ITEM_TYPE_ID: i64 = 14;

/// Name of the field carrying an item's display title in `fields`.
pub const TITLE_FIELD: &str = "title";

/// Only attachments with this content type are mirrored.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Prefix marking an attachment path as relative to managed storage.
pub const STORAGE_PREFIX: &str = "storage:";

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Read-only view over the library snapshot.
#[derive(Debug, Clone)]
pub struct Catalog {
    db: Database,
}

impl Catalog {
    /// Creates a catalog over the given snapshot handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Loads the collection tree for one library, keyed by collection id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn load_collections(&self, library_id: i64) -> Result<HashMap<i64, Collection>> {
        let rows: Vec<types::CollectionRow> = sqlx::query_as(
            "SELECT collectionID, collectionName, parentCollectionID \
             FROM collections \
             WHERE libraryID = ?",
        )
        .bind(library_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                (
                    row.collection_id,
                    Collection {
                        name: row.collection_name,
                        parent_id: row.parent_collection_id,
                    },
                )
            })
            .collect())
    }

    /// Loads every (collection, item) pairing with the item's title.
    ///
    /// The title is left-joined through `itemData`/`itemDataValues`, so items
    /// without one come back with `title: None`. Items whose type marks them
    /// as attachments are excluded; they only appear through
    /// [`Self::load_attachments`] on their parent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn load_items(&self) -> Result<Vec<CatalogItem>> {
        let items: Vec<CatalogItem> = sqlx::query_as(
            "SELECT ci.collectionID, i.itemID, idv.value AS title \
             FROM collectionItems ci \
             JOIN items i ON ci.itemID = i.itemID \
             LEFT JOIN itemData id ON i.itemID = id.itemID AND id.fieldID = \
                 (SELECT fieldID FROM fields WHERE fieldName = ?) \
             LEFT JOIN itemDataValues idv ON id.valueID = idv.valueID \
             WHERE i.itemTypeID != ? \
             ORDER BY i.itemID",
        )
        .bind(TITLE_FIELD)
        .bind(ATTACHMENT_ITEM_TYPE_ID)
        .fetch_all(self.db.pool())
        .await?;

        Ok(items)
    }

    /// Loads the PDF attachments whose parent is the given item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] if the query fails.
    #[instrument(skip(self))]
    pub async fn load_attachments(&self, item_id: i64) -> Result<Vec<AttachmentRef>> {
        let attachments: Vec<AttachmentRef> = sqlx::query_as(
            "SELECT ia.path, i.key \
             FROM itemAttachments ia \
             JOIN items i ON ia.itemID = i.itemID \
             WHERE ia.parentItemID = ? AND ia.contentType = ?",
        )
        .bind(item_id)
        .bind(PDF_CONTENT_TYPE)
        .fetch_all(self.db.pool())
        .await?;

        Ok(attachments)
    }

    /// Closes the underlying snapshot handle.
    pub async fn close(self) {
        self.db.close().await;
    }
}
