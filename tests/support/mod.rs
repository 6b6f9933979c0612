//! Shared fixture builder for integration tests.
//!
//! Builds a miniature Zotero data directory: a `zotero.sqlite` with the
//! subset of the schema the mirror reads, a `storage/` tree with attachment
//! files, and helpers for inserting collections, items, and attachments.

// Each integration test crate compiles this module separately and uses a
// different subset of the helpers.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tempfile::TempDir;

/// Zotero's itemTypeID for attachments.
pub const ATTACHMENT_TYPE: i64 = 14;

/// An arbitrary non-attachment itemTypeID (journalArticle).
pub const ARTICLE_TYPE: i64 = 2;

/// A throwaway Zotero data directory with a writable library database.
pub struct ZoteroFixture {
    /// Keeps the temp directory alive for the fixture's lifetime.
    temp: TempDir,
    pool: SqlitePool,
    next_value_id: i64,
}

impl ZoteroFixture {
    /// Creates the data directory, schema, and the `title` field row.
    pub async fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir(temp.path().join("storage")).expect("failed to create storage dir");

        let url = format!(
            "sqlite:{}?mode=rwc",
            temp.path().join("zotero.sqlite").display()
        );
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("failed to create fixture database");

        let schema = [
            "CREATE TABLE collections (collectionID INTEGER PRIMARY KEY, collectionName TEXT NOT NULL, parentCollectionID INTEGER, libraryID INTEGER NOT NULL)",
            "CREATE TABLE items (itemID INTEGER PRIMARY KEY, itemTypeID INTEGER NOT NULL, key TEXT NOT NULL)",
            "CREATE TABLE collectionItems (collectionID INTEGER NOT NULL, itemID INTEGER NOT NULL)",
            "CREATE TABLE itemAttachments (itemID INTEGER PRIMARY KEY, parentItemID INTEGER, contentType TEXT, path TEXT)",
            "CREATE TABLE itemData (itemID INTEGER NOT NULL, fieldID INTEGER NOT NULL, valueID INTEGER NOT NULL)",
            "CREATE TABLE itemDataValues (valueID INTEGER PRIMARY KEY, value TEXT NOT NULL)",
            "CREATE TABLE fields (fieldID INTEGER PRIMARY KEY, fieldName TEXT NOT NULL)",
            "INSERT INTO fields (fieldID, fieldName) VALUES (1, 'title')",
        ];
        for statement in schema {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .expect("failed to apply fixture schema");
        }

        Self {
            temp,
            pool,
            next_value_id: 1,
        }
    }

    /// The fixture's data directory (holds zotero.sqlite and storage/).
    pub fn data_dir(&self) -> &Path {
        self.temp.path()
    }

    /// Inserts a collection into the user library.
    pub async fn add_collection(&self, id: i64, name: &str, parent_id: Option<i64>) {
        self.add_collection_in_library(id, name, parent_id, 1).await;
    }

    /// Inserts a collection into an arbitrary library.
    pub async fn add_collection_in_library(
        &self,
        id: i64,
        name: &str,
        parent_id: Option<i64>,
        library_id: i64,
    ) {
        sqlx::query(
            "INSERT INTO collections (collectionID, collectionName, parentCollectionID, libraryID) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(parent_id)
        .bind(library_id)
        .execute(&self.pool)
        .await
        .expect("failed to insert collection");
    }

    /// Inserts an item of the given type, with an optional title.
    pub async fn add_item(&mut self, item_id: i64, item_type: i64, title: Option<&str>) {
        sqlx::query("INSERT INTO items (itemID, itemTypeID, key) VALUES (?, ?, ?)")
            .bind(item_id)
            .bind(item_type)
            .bind(format!("ITEM{item_id:04}"))
            .execute(&self.pool)
            .await
            .expect("failed to insert item");

        if let Some(title) = title {
            let value_id = self.next_value_id;
            self.next_value_id += 1;
            sqlx::query("INSERT INTO itemDataValues (valueID, value) VALUES (?, ?)")
                .bind(value_id)
                .bind(title)
                .execute(&self.pool)
                .await
                .expect("failed to insert title value");
            sqlx::query("INSERT INTO itemData (itemID, fieldID, valueID) VALUES (?, 1, ?)")
                .bind(item_id)
                .bind(value_id)
                .execute(&self.pool)
                .await
                .expect("failed to insert item data");
        }
    }

    /// Files an item under a collection.
    pub async fn file_item(&self, collection_id: i64, item_id: i64) {
        sqlx::query("INSERT INTO collectionItems (collectionID, itemID) VALUES (?, ?)")
            .bind(collection_id)
            .bind(item_id)
            .execute(&self.pool)
            .await
            .expect("failed to file item");
    }

    /// Inserts an attachment item plus its itemAttachments row.
    ///
    /// `path` is stored verbatim; pass `Some("storage:<file>")` for managed
    /// storage, an absolute path, or `None` for a pathless record.
    pub async fn add_attachment(
        &self,
        attachment_item_id: i64,
        key: &str,
        parent_item_id: i64,
        content_type: &str,
        path: Option<&str>,
    ) {
        sqlx::query("INSERT INTO items (itemID, itemTypeID, key) VALUES (?, ?, ?)")
            .bind(attachment_item_id)
            .bind(ATTACHMENT_TYPE)
            .bind(key)
            .execute(&self.pool)
            .await
            .expect("failed to insert attachment item");

        sqlx::query(
            "INSERT INTO itemAttachments (itemID, parentItemID, contentType, path) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(attachment_item_id)
        .bind(parent_item_id)
        .bind(content_type)
        .bind(path)
        .execute(&self.pool)
        .await
        .expect("failed to insert attachment record");
    }

    /// Writes a file into managed storage under the given attachment key.
    pub fn write_storage_file(&self, key: &str, filename: &str, contents: &[u8]) -> PathBuf {
        let dir = self.temp.path().join("storage").join(key);
        std::fs::create_dir_all(&dir).expect("failed to create storage key dir");
        let path = dir.join(filename);
        std::fs::write(&path, contents).expect("failed to write storage file");
        path
    }

    /// Commits the fixture: closes the writer pool so the database file is
    /// complete on disk. The data directory stays alive via `self.temp`.
    pub async fn seal(&self) {
        self.pool.close().await;
    }
}

/// Recursively lists files under `root` as (relative path, contents) pairs,
/// sorted by path. Used for idempotence comparisons.
#[allow(dead_code)]
pub fn tree_contents(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) {
        for entry in std::fs::read_dir(dir).expect("failed to read dir") {
            let entry = entry.expect("failed to read dir entry");
            let path = entry.path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path
                    .strip_prefix(root)
                    .expect("entry outside root")
                    .to_path_buf();
                let contents = std::fs::read(&path).expect("failed to read file");
                out.push((relative, contents));
            }
        }
    }

    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}
