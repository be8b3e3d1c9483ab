//! `mn init` — create the data directory and its SQLite store.

use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

use mnemo_core::store;
use mnemo_core::store::migrations;

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct InitArgs {}

#[derive(Debug, Serialize)]
struct InitReport {
    path: String,
    schema_version: u32,
    created: bool,
}

/// Execute `mn init`. Opening runs any pending schema migrations, so
/// re-running against an existing store upgrades it in place.
pub fn run_init(_args: &InitArgs, output: OutputMode, data_dir: &Path) -> Result<()> {
    let path = super::store_path(data_dir);
    let created = !path.exists();

    let conn = store::open(&path)
        .with_context(|| format!("initialize store at {}", path.display()))?;
    let schema_version = migrations::current_schema_version(&conn)?;

    tracing::info!(path = %path.display(), schema_version, created, "store ready");

    let report = InitReport {
        path: path.display().to_string(),
        schema_version,
        created,
    };
    render(output, &report, |report, w| {
        if report.created {
            writeln!(w, "✓ initialized store at {}", report.path)?;
        } else {
            writeln!(w, "✓ store at {} (already initialized)", report.path)?;
        }
        writeln!(w, "  schema version: {}", report.schema_version)
    })
}
