//! Run configuration for the mirror pipeline.
//!
//! The original tool hard-coded its paths and copy-vs-symlink mode as
//! module-level constants. Here they travel in an explicit [`MirrorConfig`]
//! passed into the pipeline entry point, so tests can substitute temporary
//! directories without touching process-global state.

use std::fmt;
use std::path::PathBuf;

/// Filename of the Zotero database inside the data directory.
const DB_FILENAME: &str = "zotero.sqlite";

/// Name of the managed-storage directory inside the data directory.
const STORAGE_DIRNAME: &str = "storage";

/// Default name of the mirror destination inside the data directory.
const DEFAULT_MIRROR_DIRNAME: &str = "ZoteroMirror";

/// How attachment files are materialized in the mirror tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// Copy file bytes and timestamps. Duplicates disk usage but survives
    /// sync tools (e.g. iCloud) that do not follow symlinks.
    #[default]
    Copy,
    /// Symlink the destination to the source file.
    Symlink,
}

impl PlacementMode {
    /// Past-tense label used in the end-of-run summary line.
    #[must_use]
    pub fn placed_label(self) -> &'static str {
        match self {
            Self::Copy => "copied",
            Self::Symlink => "linked",
        }
    }
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Copy => "copy",
            Self::Symlink => "symlink",
        };
        write!(f, "{label}")
    }
}

/// Configuration for one mirror run.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Zotero data directory containing `zotero.sqlite` and `storage/`.
    pub data_dir: PathBuf,
    /// Destination root for the mirror tree. Wiped and rebuilt every run.
    pub mirror_dir: PathBuf,
    /// Where the database snapshot is written before being opened.
    pub snapshot_path: PathBuf,
    /// Zotero library to mirror. Library 1 is the user's personal library.
    pub library_id: i64,
    /// Copy vs symlink placement.
    pub placement: PlacementMode,
}

impl MirrorConfig {
    /// Builds a configuration with defaults derived from the data directory:
    /// mirror tree at `<data_dir>/ZoteroMirror`, snapshot in the system temp
    /// directory (unique per process), user library, copy mode.
    #[must_use]
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let mirror_dir = data_dir.join(DEFAULT_MIRROR_DIRNAME);
        let snapshot_path =
            std::env::temp_dir().join(format!("zotero-mirror-{}.sqlite", std::process::id()));
        Self {
            data_dir,
            mirror_dir,
            snapshot_path,
            library_id: crate::catalog::USER_LIBRARY_ID,
            placement: PlacementMode::default(),
        }
    }

    /// Path to the Zotero database inside the data directory.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILENAME)
    }

    /// Path to the managed-storage root inside the data directory.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join(STORAGE_DIRNAME)
    }

    /// Returns the config with the mirror destination replaced.
    #[must_use]
    pub fn with_mirror_dir(mut self, mirror_dir: impl Into<PathBuf>) -> Self {
        self.mirror_dir = mirror_dir.into();
        self
    }

    /// Returns the config with the snapshot location replaced.
    #[must_use]
    pub fn with_snapshot_path(mut self, snapshot_path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = snapshot_path.into();
        self
    }

    /// Returns the config with the placement mode replaced.
    #[must_use]
    pub fn with_placement(mut self, placement: PlacementMode) -> Self {
        self.placement = placement;
        self
    }
}
