//! Command handlers for the `mn` binary.
//!
//! Each submodule owns one subcommand: an `Args` struct plus a `run_*`
//! entry point taking the resolved [`OutputMode`](crate::output::OutputMode)
//! and the store directory.

use anyhow::{Context as _, Result};
use std::env;
use std::path::{Path, PathBuf};

use mnemo_core::ErrorCode;

use crate::output::{self, CliError, OutputMode};

pub mod grade;
pub mod init;
pub mod seed;
pub mod stats;
pub mod study;

/// File name of the SQLite store inside the data directory.
const STORE_FILE: &str = "mnemo.db";

/// Resolve the data directory: `--data-dir` flag, then `MNEMO_DATA_DIR`,
/// then the platform data dir (`~/.local/share/mnemo` on Linux).
pub fn resolve_data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    if let Ok(dir) = env::var("MNEMO_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|base| base.join("mnemo"))
        .context("no platform data directory; pass --data-dir")
}

/// Path of the SQLite store inside `data_dir`.
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STORE_FILE)
}

/// Open the store, surfacing a structured error when it was never
/// initialized or cannot be opened.
pub fn open_existing_store(data_dir: &Path, output: OutputMode) -> Result<rusqlite::Connection> {
    let path = store_path(data_dir);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no store file");
        return Err(output::report(
            output,
            &CliError::from_code(ErrorCode::NotInitialized),
        ));
    }
    mnemo_core::store::open(&path).map_err(|err| {
        output::report(
            output,
            &CliError::with_message(ErrorCode::CorruptStore, format!("{err:#}")),
        )
    })
}
