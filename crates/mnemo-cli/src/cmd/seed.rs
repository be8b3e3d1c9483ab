//! `mn seed` — load catalog items from a JSON export.
//!
//! The input is a JSON array of item objects. Existing ids are updated,
//! not duplicated, so re-seeding from an updated export is safe.

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use mnemo_core::model::Item;
use mnemo_core::store::catalog;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// JSON file containing an array of catalog items.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct SeedReport {
    loaded: usize,
    catalog_total: u64,
}

/// Execute `mn seed`.
pub fn run_seed(args: &SeedArgs, output: OutputMode, data_dir: &Path) -> Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("read seed file {}", args.file.display()))?;
    let items: Vec<Item> = serde_json::from_str(&raw)
        .with_context(|| format!("parse seed file {}", args.file.display()))?;

    let mut conn = super::open_existing_store(data_dir, output)?;
    let loaded = catalog::insert_items(&mut conn, &items)?;
    let catalog_total = catalog::count(&conn)?;

    tracing::info!(loaded, catalog_total, "catalog seeded");

    let report = SeedReport {
        loaded,
        catalog_total,
    };
    render(output, &report, |report, w| {
        writeln!(
            w,
            "✓ loaded {} items ({} total in catalog)",
            report.loaded, report.catalog_total
        )
    })
}
