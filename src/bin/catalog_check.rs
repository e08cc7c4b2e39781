//! catalog_check - offline validation for annoreel catalogs
//!
//! Checks everything that would abort playback, without playing anything:
//! - the catalog file parses and every detection's geometry is legal
//! - the slot pool sizing each kind requires
//! - optionally, that every background reference exists under an asset root
//!
//! Exits non-zero on the first structural failure or when any asset is
//! missing, so the check can gate a render pipeline.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;

use annoreel::{DetectionCatalog, DetectionKind, OverlaySlotPool};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the catalog JSON file.
    #[arg(long)]
    catalog: String,
    /// Treat background references as paths relative to this directory and
    /// verify each one exists.
    #[arg(long)]
    asset_root: Option<PathBuf>,
    /// Print one line per subject.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let catalog = DetectionCatalog::from_json_file(&args.catalog)?;
    let pool = OverlaySlotPool::for_catalog(&catalog);

    if args.verbose {
        for (i, subject) in catalog.subjects().iter().enumerate() {
            println!(
                "subject {:>3}: {} ({} image, {} text, {} scene)",
                i,
                subject.background,
                subject.image_detections.len(),
                subject.text_detections.len(),
                subject.scene_detections.len()
            );
        }
    }

    let mut missing = Vec::new();
    if let Some(root) = &args.asset_root {
        let references: BTreeSet<&str> = catalog
            .subjects()
            .iter()
            .map(|s| s.background.as_str())
            .collect();
        for reference in references {
            if !root.join(reference).exists() {
                missing.push(reference.to_string());
            }
        }
    }

    println!(
        "catalog OK: {} subjects, {} image slots, {} text slots",
        catalog.len(),
        pool.capacity(DetectionKind::Image),
        pool.capacity(DetectionKind::Text)
    );

    if !missing.is_empty() {
        for reference in &missing {
            eprintln!("missing asset: {}", reference);
        }
        return Err(anyhow!("{} background asset(s) missing", missing.len()));
    }
    Ok(())
}
