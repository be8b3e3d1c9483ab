//! `mn grade` — record one graded review.
//!
//! Applies the review algorithm to the item's progress, persists the
//! result, then folds the XP award into the stored progression state
//! using the local calendar date.

use anyhow::Result;
use chrono::{Local, Utc};
use clap::Args;
use serde::Serialize;
use std::io::Write as _;
use std::path::Path;

use mnemo_core::model::Grade;
use mnemo_core::scheduler::grade_item;
use mnemo_core::store::progression;
use mnemo_core::ProgressionState;

use crate::output::{self, CliError, OutputMode, render};

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Item id to grade.
    #[arg(value_name = "ITEM_ID")]
    pub item_id: String,

    /// Grade: again, hard, good, easy (or 1-4).
    #[arg(value_name = "GRADE")]
    pub grade: Grade,
}

#[derive(Debug, Serialize)]
struct GradeReport {
    item_id: String,
    status: String,
    interval_days: f64,
    due_at: String,
    xp_awarded: u64,
    progression: ProgressionState,
}

/// Execute `mn grade`.
pub fn run_grade(args: &GradeArgs, output: OutputMode, data_dir: &Path) -> Result<()> {
    let mut conn = super::open_existing_store(data_dir, output)?;

    let outcome = grade_item(&mut conn, &args.item_id, args.grade, Utc::now())
        .map_err(|err| output::report(output, &CliError::from(&err)))?;

    let today = Local::now().date_naive();
    let state = progression::load(&conn)?.record_xp(outcome.xp_awarded, today);
    progression::save(&conn, &state)?;

    let report = GradeReport {
        item_id: args.item_id.clone(),
        status: outcome.progress.status.to_string(),
        interval_days: outcome.progress.interval_days,
        due_at: outcome.progress.due_at.to_rfc3339(),
        xp_awarded: outcome.xp_awarded,
        progression: state,
    };
    render(output, &report, |report, w| {
        writeln!(
            w,
            "✓ graded '{}' ({}) — next review in {} days",
            report.item_id, report.status, report.interval_days
        )?;
        writeln!(
            w,
            "  +{} XP (level {}, {} XP today, streak {} days)",
            report.xp_awarded,
            report.progression.level,
            report.progression.xp_today,
            report.progression.streak_days
        )
    })
}
