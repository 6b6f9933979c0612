//! CLI entry point for the zotero-mirror tool.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use zotero_mirror_core::{Catalog, Database, MirrorConfig, MirrorEngine, PlacementMode};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let mut config = MirrorConfig::for_data_dir(args.data_dir);
    if let Some(mirror_dir) = args.mirror_dir {
        config.mirror_dir = mirror_dir;
    }
    config.library_id = args.library_id;
    if args.symlink {
        config.placement = PlacementMode::Symlink;
    }

    info!(
        data_dir = %config.data_dir.display(),
        mirror_dir = %config.mirror_dir.display(),
        library_id = config.library_id,
        mode = %config.placement,
        "Mirror starting"
    );

    let db = Database::snapshot(&config.db_path(), &config.snapshot_path).await?;
    let catalog = Catalog::new(db);

    let placement = config.placement;
    let engine = MirrorEngine::new(config);
    let stats = engine.run(&catalog).await?;

    catalog.close().await;

    info!(
        placed = stats.placed(),
        already_placed = stats.already_placed(),
        missing_source = stats.missing_source(),
        no_path = stats.no_path(),
        items = stats.items(),
        collections = stats.collections(),
        "Mirror complete"
    );

    println!("Done. {} PDFs {}.", stats.placed(), placement.placed_label());

    Ok(())
}
