//! `mn stats` — learner progress dashboard.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

use mnemo_core::store::{catalog, progress, progression};
use mnemo_core::{ProgressionState, StudyConfig};

use crate::output::{OutputMode, render};

#[derive(Args, Debug, Default)]
pub struct StatsArgs {}

/// Report payload for `mn stats`.
#[derive(Debug, Serialize)]
pub struct LearnerStats {
    pub catalog_total: u64,
    pub seen: u64,
    pub due_now: usize,
    pub daily_goal_xp: u64,
    pub progression: ProgressionState,
}

/// Execute `mn stats`.
pub fn run_stats(
    _args: &StatsArgs,
    config: &StudyConfig,
    output: OutputMode,
    data_dir: &Path,
) -> Result<()> {
    let conn = super::open_existing_store(data_dir, output)?;

    let payload = LearnerStats {
        catalog_total: catalog::count(&conn)?,
        seen: progress::count(&conn)?,
        due_now: progress::due_before(&conn, Utc::now(), None)?.len(),
        daily_goal_xp: config.daily_goal_xp,
        progression: progression::load(&conn)?,
    };

    render(output, &payload, |stats, w| {
        let p = &stats.progression;
        writeln!(w, "Catalog")?;
        writeln!(w, "  items:      {}", stats.catalog_total)?;
        writeln!(w, "  seen:       {}", stats.seen)?;
        writeln!(w, "  due now:    {}", stats.due_now)?;
        writeln!(w, "Progression")?;
        writeln!(w, "  level:      {} ({} / {} XP)", p.level, p.total_xp, p.next_level_xp)?;
        writeln!(w, "  today:      {} / {} XP", p.xp_today, stats.daily_goal_xp)?;
        writeln!(w, "  streak:     {} days", p.streak_days)
    })
}
