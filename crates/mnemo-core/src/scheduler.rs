//! The grading seam: validate, advance, persist.
//!
//! [`grade_item`] is the single write path for progress state. It refuses
//! ids with no catalog entry rather than silently initializing progress
//! for a nonexistent item, and initializes-if-absent for items seen for
//! the first time. Applying the XP award to the stored
//! [`crate::progression::ProgressionState`] stays with the caller, which
//! owns the calendar date.

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::error::SchedulerError;
use crate::model::{Grade, ProgressRecord};
use crate::srs;
use crate::store::{catalog, progress};

/// The result of grading a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    /// The persisted post-review progress record.
    pub progress: ProgressRecord,
    /// XP earned by this review, per the fixed grade reward table.
    pub xp_awarded: u64,
}

/// Grade one item: validate the id, advance its progress, persist it.
///
/// Once the write is issued it is not revocable here; compensating writes
/// are the caller's responsibility.
///
/// # Errors
///
/// [`SchedulerError::ItemNotFound`] for an id with no catalog entry;
/// [`SchedulerError::Store`] when the underlying store fails.
pub fn grade_item(
    conn: &mut Connection,
    item_id: &str,
    grade: Grade,
    now: DateTime<Utc>,
) -> Result<GradeOutcome, SchedulerError> {
    if catalog::get(conn, item_id)?.is_none() {
        return Err(SchedulerError::ItemNotFound {
            item_id: item_id.to_string(),
        });
    }

    let current: ProgressRecord =
        progress::get(conn, item_id)?.unwrap_or_else(|| srs::initialize(item_id, now));

    let next = srs::advance(&current, grade, now);
    progress::put(conn, &next)?;

    tracing::info!(
        item_id,
        grade = %grade,
        interval_days = next.interval_days,
        status = %next.status,
        "graded review"
    );

    Ok(GradeOutcome {
        progress: next,
        xp_awarded: grade.xp_reward(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentKind, Item, Level, Status};
    use crate::store::open_in_memory;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).single().expect("valid timestamp")
    }

    fn seeded_conn() -> Connection {
        let mut conn = open_in_memory().expect("open store");
        let item = Item {
            id: "ambition".to_string(),
            display_text: "Ambition".to_string(),
            normalized_text: "ambition".to_string(),
            rank: 812,
            level: Level::B1,
            kind: ContentKind::Word,
            ..Item::default()
        };
        catalog::insert_items(&mut conn, &[item]).expect("seed");
        conn
    }

    #[test]
    fn grading_unknown_item_is_rejected_without_side_effects() {
        let mut conn = seeded_conn();
        let err = grade_item(&mut conn, "ghost", Grade::Good, fixed_now())
            .expect_err("unknown id must be rejected");
        assert!(matches!(err, SchedulerError::ItemNotFound { .. }));

        assert_eq!(
            progress::count(&conn).expect("count"),
            0,
            "rejection must not initialize progress"
        );
    }

    #[test]
    fn first_grade_initializes_then_advances() {
        let mut conn = seeded_conn();
        let outcome =
            grade_item(&mut conn, "ambition", Grade::Good, fixed_now()).expect("grade");

        assert_eq!(outcome.xp_awarded, 10);
        assert_eq!(outcome.progress.status, Status::Review);
        assert_eq!(outcome.progress.consecutive_correct, 1);

        let persisted = progress::get(&conn, "ambition").expect("get").expect("row");
        assert_eq!(persisted, outcome.progress);
    }

    #[test]
    fn repeated_grades_extend_the_persisted_history() {
        let mut conn = seeded_conn();
        let now = fixed_now();
        grade_item(&mut conn, "ambition", Grade::Good, now).expect("grade");
        let outcome = grade_item(&mut conn, "ambition", Grade::Again, now).expect("grade");

        assert_eq!(outcome.xp_awarded, 5);
        assert_eq!(outcome.progress.status, Status::Learning);
        assert_eq!(outcome.progress.history.len(), 2);
    }
}
