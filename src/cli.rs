//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use zotero_mirror_core::USER_LIBRARY_ID;

/// Mirror a Zotero library's collection tree onto the filesystem.
///
/// Reads a point-in-time snapshot of the library database, rebuilds the
/// destination directory tree from scratch, and copies (or symlinks) every
/// item's PDF attachment into the folder matching its collection path.
#[derive(Parser, Debug)]
#[command(name = "zotero-mirror")]
#[command(author, version, about)]
pub struct Args {
    /// Zotero data directory (contains zotero.sqlite and storage/)
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Destination for the mirror tree [default: DATA_DIR/ZoteroMirror]
    #[arg(short = 'm', long, value_name = "DIR")]
    pub mirror_dir: Option<PathBuf>,

    /// Symlink attachments instead of copying them
    #[arg(short = 's', long)]
    pub symlink: bool,

    /// Zotero library to mirror (1 is the personal library)
    #[arg(long, default_value_t = USER_LIBRARY_ID)]
    pub library_id: i64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
