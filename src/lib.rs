//! Zotero Mirror Core Library
//!
//! This library mirrors a Zotero reference library's hierarchical collection
//! structure onto a plain filesystem tree, placing each item's PDF attachment
//! into the directory corresponding to its collection path.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration passed into the pipeline entry point
//! - [`db`] - Database snapshotting, read-only access, schema verification
//! - [`catalog`] - Read operations against the library snapshot
//! - [`mirror`] - Path resolution, tree rebuild, attachment placement
//!
//! A run is a single sequential pass: snapshot the database, load the
//! catalog, wipe and rebuild the destination tree, place attachments.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod db;
pub mod mirror;

// Re-export commonly used types
pub use catalog::{
    ATTACHMENT_ITEM_TYPE_ID, AttachmentRef, Catalog, CatalogError, CatalogItem, Collection,
    PDF_CONTENT_TYPE, STORAGE_PREFIX, TITLE_FIELD, USER_LIBRARY_ID,
};
pub use config::{MirrorConfig, PlacementMode};
pub use db::{Database, DbError};
pub use mirror::{MirrorEngine, MirrorError, MirrorStats, PathError, resolve_collection_path};
