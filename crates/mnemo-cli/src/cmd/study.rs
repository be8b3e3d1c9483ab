//! `mn study` — build and print a study queue.
//!
//! Read-only: the queue is computed from current progress state and
//! printed; nothing is persisted until items are graded.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write as _;
use std::path::Path;

use mnemo_core::model::Level;
use mnemo_core::session::{SessionEntry, SessionMode, SessionRequest, build_session};
use mnemo_core::StudyConfig;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct StudyArgs {
    /// Maximum queue length (default from config).
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Restrict to one difficulty tier (a1..c2).
    #[arg(long)]
    pub level: Option<Level>,

    /// Queue composition: mixed, review, new, or phrase.
    #[arg(long, default_value = "mixed")]
    pub mode: SessionMode,

    /// Seed the shuffle for a reproducible queue.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,
}

/// Execute `mn study`.
pub fn run_study(
    args: &StudyArgs,
    config: &StudyConfig,
    output: OutputMode,
    data_dir: &Path,
) -> Result<()> {
    let mut conn = super::open_existing_store(data_dir, output)?;

    let mut request = SessionRequest::new(
        args.limit.unwrap_or(config.session_limit),
        args.level,
        args.mode,
    );
    request.phrase_mix = config.phrase_mix;

    let now = Utc::now();
    let queue = match args.seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            build_session(&mut conn, &request, now, &mut rng)?
        }
        None => build_session(&mut conn, &request, now, &mut rand::thread_rng())?,
    };

    render(output, &queue, |queue, w| {
        if queue.is_empty() {
            return writeln!(w, "Nothing to study right now.");
        }
        writeln!(w, "Study queue ({} items):", queue.len())?;
        for (pos, entry) in queue.iter().enumerate() {
            writeln!(w, "{:>3}. {}", pos + 1, describe(entry))?;
        }
        Ok(())
    })
}

fn describe(entry: &SessionEntry) -> String {
    let marker = if entry.is_new() { "new" } else { "due" };
    let translation = if entry.item.translation.is_empty() {
        String::new()
    } else {
        format!(" — {}", entry.item.translation)
    };
    format!(
        "[{marker}] ({}) {}{translation}",
        entry.item.kind, entry.item.display_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::model::Item;

    #[test]
    fn describe_marks_new_items() {
        let entry = SessionEntry {
            item: Item {
                id: "ambition".into(),
                display_text: "ambition".into(),
                translation: "yraky".into(),
                ..Item::default()
            },
            progress: Some(mnemo_core::srs::initialize("ambition", Utc::now())),
        };
        let line = describe(&entry);
        assert!(line.contains("[new]"));
        assert!(line.contains("ambition"));
        assert!(line.contains("yraky"));
    }
}
