//! Mirror pipeline: tree rebuild and attachment placement.
//!
//! This module provides the [`MirrorEngine`], which drives one run end to
//! end: load the catalog, wipe and recreate the destination root, then for
//! every (collection, item) pairing materialize the collection's directory
//! and place the item's PDF attachments into it.
//!
//! # Example
//!
//! ```no_run
//! use zotero_mirror_core::{Catalog, Database, MirrorConfig, MirrorEngine};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MirrorConfig::for_data_dir("/home/user/Zotero");
//! let db = Database::snapshot(&config.db_path(), &config.snapshot_path).await?;
//! let catalog = Catalog::new(db);
//! let stats = MirrorEngine::new(config).run(&catalog).await?;
//! println!("placed {} PDFs", stats.placed());
//! # Ok(())
//! # }
//! ```

pub mod filename;
pub mod paths;

mod error;

pub use error::MirrorError;
pub use paths::{PathError, resolve_collection_path};

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::symlink;
#[cfg(windows)]
use std::os::windows::fs::symlink_file as symlink;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::catalog::{AttachmentRef, Catalog, STORAGE_PREFIX};
use crate::config::{MirrorConfig, PlacementMode};
use filename::Destination;

/// Result type for mirror operations.
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Statistics from one mirror run.
///
/// The run is sequential, so plain counters suffice.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorStats {
    placed: usize,
    already_placed: usize,
    missing_source: usize,
    no_path: usize,
    items: usize,
    collections: usize,
}

impl MirrorStats {
    /// Attachments copied or linked into the tree this run.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Attachments whose destination already resolved to the source file.
    #[must_use]
    pub fn already_placed(&self) -> usize {
        self.already_placed
    }

    /// Attachments whose resolved source file was absent on disk.
    #[must_use]
    pub fn missing_source(&self) -> usize {
        self.missing_source
    }

    /// Attachment records without a usable path.
    #[must_use]
    pub fn no_path(&self) -> usize {
        self.no_path
    }

    /// (collection, item) pairings visited.
    #[must_use]
    pub fn items(&self) -> usize {
        self.items
    }

    /// Collections loaded from the library.
    #[must_use]
    pub fn collections(&self) -> usize {
        self.collections
    }

    /// Attachments skipped for any reason.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.already_placed + self.missing_source + self.no_path
    }
}

/// Drives one full mirror run against a loaded catalog.
#[derive(Debug)]
pub struct MirrorEngine {
    config: MirrorConfig,
}

impl MirrorEngine {
    /// Creates an engine for the given run configuration.
    #[must_use]
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline: catalog load, tree rebuild, attachment placement.
    ///
    /// The destination tree is deleted and recreated before any placement,
    /// so a failed run can leave it partially repopulated.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::Catalog`] on query failure,
    /// [`MirrorError::Path`] on a dangling or cyclic collection parent, and
    /// [`MirrorError::Io`] on any filesystem failure outside the documented
    /// per-attachment skips.
    #[instrument(skip_all, fields(mirror_dir = %self.config.mirror_dir.display()))]
    pub async fn run(&self, catalog: &Catalog) -> Result<MirrorStats> {
        let collections = catalog.load_collections(self.config.library_id).await?;
        let items = catalog.load_items().await?;
        info!(
            collections = collections.len(),
            item_pairings = items.len(),
            "catalog loaded"
        );

        self.rebuild_root()?;

        let mut stats = MirrorStats {
            collections: collections.len(),
            ..MirrorStats::default()
        };

        for item in &items {
            let segments = resolve_collection_path(item.collection_id, &collections)?;
            let dest_dir = segments
                .iter()
                .fold(self.config.mirror_dir.clone(), |dir, segment| {
                    dir.join(segment)
                });
            fs::create_dir_all(&dest_dir).map_err(|e| MirrorError::io(&dest_dir, e))?;
            stats.items += 1;

            for attachment in catalog.load_attachments(item.item_id).await? {
                self.place(&dest_dir, item.title.as_deref(), &attachment, &mut stats)?;
            }
        }

        info!(
            placed = stats.placed,
            already_placed = stats.already_placed,
            missing_source = stats.missing_source,
            no_path = stats.no_path,
            "mirror rebuilt"
        );
        Ok(stats)
    }

    /// Deletes the destination root if present and recreates it empty.
    fn rebuild_root(&self) -> Result<()> {
        let root = &self.config.mirror_dir;
        if root.exists() {
            fs::remove_dir_all(root).map_err(|e| MirrorError::io(root, e))?;
            debug!(root = %root.display(), "previous mirror tree removed");
        }
        fs::create_dir_all(root).map_err(|e| MirrorError::io(root, e))?;
        Ok(())
    }

    /// Places one attachment into `dest_dir`, or records why it was skipped.
    fn place(
        &self,
        dest_dir: &Path,
        title: Option<&str>,
        attachment: &AttachmentRef,
        stats: &mut MirrorStats,
    ) -> Result<()> {
        let Some(source) = resolve_source(attachment, &self.config.storage_dir()) else {
            debug!(key = %attachment.key, "attachment record has no usable path");
            stats.no_path += 1;
            return Ok(());
        };

        if !source.exists() {
            warn!(
                key = %attachment.key,
                path = %source.display(),
                "attachment file missing on disk"
            );
            stats.missing_source += 1;
            return Ok(());
        }

        let stem = filename::sanitize_title(title);
        let destination = filename::resolve_destination(dest_dir, &stem, &source)
            .map_err(|e| MirrorError::io(dest_dir, e))?;

        match destination {
            Destination::AlreadyPlaced(dest) => {
                debug!(dest = %dest.display(), "destination already resolves to source");
                stats.already_placed += 1;
            }
            Destination::New(dest) => {
                match self.config.placement {
                    PlacementMode::Symlink => {
                        symlink(&source, &dest).map_err(|e| MirrorError::io(&dest, e))?;
                    }
                    PlacementMode::Copy => {
                        copy_with_times(&source, &dest).map_err(|e| MirrorError::io(&dest, e))?;
                    }
                }
                debug!(
                    source = %source.display(),
                    dest = %dest.display(),
                    mode = %self.config.placement,
                    "attachment placed"
                );
                stats.placed += 1;
            }
        }

        Ok(())
    }
}

/// Resolves an attachment record to the file it points at on disk.
///
/// `storage:`-prefixed paths live under `<storage_dir>/<key>/`; anything else
/// non-empty is taken as an absolute path. Returns `None` for records with no
/// usable path.
fn resolve_source(attachment: &AttachmentRef, storage_dir: &Path) -> Option<PathBuf> {
    let path = attachment.path.as_deref().filter(|p| !p.is_empty())?;
    if let Some(remainder) = path.strip_prefix(STORAGE_PREFIX) {
        Some(storage_dir.join(&attachment.key).join(remainder))
    } else {
        Some(PathBuf::from(path))
    }
}

/// Copies file bytes and carries over the source's access/modification times.
fn copy_with_times(source: &Path, dest: &Path) -> std::io::Result<()> {
    fs::copy(source, dest)?;
    let metadata = fs::metadata(source)?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    let atime = filetime::FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(dest, atime, mtime)
}
