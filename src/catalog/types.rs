//! Row types read from the library snapshot.

use sqlx::FromRow;

/// A collection in the library's folder hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    /// Display name, used verbatim as a path segment in the mirror tree.
    pub name: String,
    /// Parent collection id; `None` for root collections.
    pub parent_id: Option<i64>,
}

/// Raw collection row as selected from the `collections` table.
#[derive(Debug, FromRow)]
pub(crate) struct CollectionRow {
    #[sqlx(rename = "collectionID")]
    pub collection_id: i64,
    #[sqlx(rename = "collectionName")]
    pub collection_name: String,
    #[sqlx(rename = "parentCollectionID")]
    pub parent_collection_id: Option<i64>,
}

/// One (collection, item) pairing with the item's display title.
///
/// An item filed into several collections yields one row per collection.
#[derive(Debug, Clone, FromRow)]
pub struct CatalogItem {
    /// Collection the item is filed under.
    #[sqlx(rename = "collectionID")]
    pub collection_id: i64,
    /// The item's id, used to look up its attachments.
    #[sqlx(rename = "itemID")]
    pub item_id: i64,
    /// Display title; `None` when the item has no title field value.
    pub title: Option<String>,
}

/// A PDF attachment record belonging to an item.
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentRef {
    /// Recorded path: `storage:<filename>` for managed storage, an absolute
    /// path otherwise, or `None` when no file was ever attached.
    pub path: Option<String>,
    /// The attachment item's key, which names its managed-storage directory.
    pub key: String,
}

impl AttachmentRef {
    /// Whether the record carries a usable path.
    #[must_use]
    pub fn has_path(&self) -> bool {
        self.path.as_deref().is_some_and(|path| !path.is_empty())
    }
}
