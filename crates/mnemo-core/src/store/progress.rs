//! Progress-store queries: per-item SRS state and grading history.
//!
//! The scheduler consumes this module through a handful of keyed
//! operations; nothing here interprets the SRS numbers, it only persists
//! them. History rows are append-only — [`put`] writes only the entries the
//! in-memory record has gained since the last persist.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params, types::Type};
use std::collections::HashSet;
use std::str::FromStr;

use super::{from_micros, to_micros};
use crate::model::{Grade, Level, ProgressRecord, ReviewLog, Status};

/// Fetch one progress record (with full history) by item id.
///
/// # Errors
///
/// Returns an error if the query fails; an unseen id yields `Ok(None)`.
pub fn get(conn: &Connection, item_id: &str) -> Result<Option<ProgressRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT item_id, status, interval_days, ease_factor, consecutive_correct, due_at_us
             FROM progress
             WHERE item_id = ?1",
        )
        .context("prepare progress get")?;

    let mut rows = stmt
        .query_map([item_id], row_without_history)
        .context("query progress record")?;

    let Some(row) = rows.next().transpose().context("decode progress record")? else {
        return Ok(None);
    };

    let mut record = finish(row)?;
    record.history = history_for(conn, item_id)?;
    Ok(Some(record))
}

/// Upsert one progress record and append its new history entries.
///
/// # Errors
///
/// Returns an error if the transaction or any statement fails.
pub fn put(conn: &mut Connection, record: &ProgressRecord) -> Result<()> {
    let tx = conn.transaction().context("begin progress put")?;

    tx.execute(
        "INSERT INTO progress (
            item_id, status, interval_days, ease_factor, consecutive_correct, due_at_us
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(item_id) DO UPDATE SET
            status = excluded.status,
            interval_days = excluded.interval_days,
            ease_factor = excluded.ease_factor,
            consecutive_correct = excluded.consecutive_correct,
            due_at_us = excluded.due_at_us",
        params![
            record.item_id,
            record.status.to_string(),
            record.interval_days,
            record.ease_factor,
            record.consecutive_correct,
            to_micros(record.due_at),
        ],
    )
    .with_context(|| format!("upsert progress for '{}'", record.item_id))?;

    let persisted: i64 = tx
        .query_row(
            "SELECT COUNT(*) FROM review_log WHERE item_id = ?1",
            [record.item_id.as_str()],
            |row| row.get(0),
        )
        .context("count persisted history")?;
    let persisted = usize::try_from(persisted).context("negative history count")?;

    for entry in record.history.iter().skip(persisted) {
        tx.execute(
            "INSERT INTO review_log (item_id, reviewed_at_us, grade, interval_days)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.item_id,
                to_micros(entry.reviewed_at),
                entry.grade.quality(),
                entry.interval_days,
            ],
        )
        .with_context(|| format!("append review log for '{}'", record.item_id))?;
    }

    tx.commit().context("commit progress put")
}

/// All records due at or before `now`, earliest-due first.
///
/// Excludes `new` records (they have never been graded and their due
/// timestamps are meaningless). `level` filters by the item's catalog tier.
///
/// # Errors
///
/// Returns an error if the query fails. Zero due records is a normal
/// terminal state, not an error.
pub fn due_before(
    conn: &Connection,
    now: DateTime<Utc>,
    level: Option<Level>,
) -> Result<Vec<ProgressRecord>> {
    let rows: Vec<RawProgressRow> = if let Some(level) = level {
        let mut stmt = conn
            .prepare(
                "SELECT p.item_id, p.status, p.interval_days, p.ease_factor,
                        p.consecutive_correct, p.due_at_us
                 FROM progress p
                 JOIN items i ON i.item_id = p.item_id
                 WHERE p.status != 'new' AND p.due_at_us <= ?1 AND i.level = ?2
                 ORDER BY p.due_at_us ASC",
            )
            .context("prepare leveled due query")?;
        let mapped = stmt
            .query_map(params![to_micros(now), level.to_string()], row_without_history)
            .context("query due records")?;
        mapped
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("decode due records")?
    } else {
        let mut stmt = conn
            .prepare(
                "SELECT item_id, status, interval_days, ease_factor,
                        consecutive_correct, due_at_us
                 FROM progress
                 WHERE status != 'new' AND due_at_us <= ?1
                 ORDER BY due_at_us ASC",
            )
            .context("prepare due query")?;
        let mapped = stmt
            .query_map([to_micros(now)], row_without_history)
            .context("query due records")?;
        mapped
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("decode due records")?
    };

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = finish(row)?;
        record.history = history_for(conn, &record.item_id)?;
        records.push(record);
    }
    Ok(records)
}

/// The set of item ids the learner has ever seen.
///
/// Used to exclude already-seen items from new-content candidate pools.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn seen_ids(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn
        .prepare("SELECT item_id FROM progress")
        .context("prepare seen-ids query")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query seen ids")?
        .collect::<rusqlite::Result<HashSet<_>>>()
        .context("decode seen ids")?;
    Ok(ids)
}

/// Number of progress records (items ever seen).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM progress", [], |row| row.get(0))
        .context("count progress records")?;
    u64::try_from(count).context("negative progress count")
}

/// Number of progress records whose item sits at `level`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_for_level(conn: &Connection, level: Level) -> Result<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*)
             FROM progress p
             JOIN items i ON i.item_id = p.item_id
             WHERE i.level = ?1",
            [level.to_string()],
            |row| row.get(0),
        )
        .context("count progress records by level")?;
    u64::try_from(count).context("negative progress count")
}

struct RawProgressRow {
    item_id: String,
    status: Status,
    interval_days: f64,
    ease_factor: f64,
    consecutive_correct: u32,
    due_at_us: i64,
}

fn row_without_history(row: &Row<'_>) -> rusqlite::Result<RawProgressRow> {
    let status_text: String = row.get(1)?;
    let status = Status::from_str(&status_text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error))
    })?;

    Ok(RawProgressRow {
        item_id: row.get(0)?,
        status,
        interval_days: row.get(2)?,
        ease_factor: row.get(3)?,
        consecutive_correct: row.get(4)?,
        due_at_us: row.get(5)?,
    })
}

fn finish(row: RawProgressRow) -> Result<ProgressRecord> {
    Ok(ProgressRecord {
        due_at: from_micros(row.due_at_us)?,
        item_id: row.item_id,
        status: row.status,
        interval_days: row.interval_days,
        ease_factor: row.ease_factor,
        consecutive_correct: row.consecutive_correct,
        history: Vec::new(),
    })
}

fn history_for(conn: &Connection, item_id: &str) -> Result<Vec<ReviewLog>> {
    let mut stmt = conn
        .prepare(
            "SELECT reviewed_at_us, grade, interval_days
             FROM review_log
             WHERE item_id = ?1
             ORDER BY log_id ASC",
        )
        .context("prepare history query")?;

    let rows = stmt
        .query_map([item_id], |row| {
            let reviewed_at_us: i64 = row.get(0)?;
            let grade_value: u8 = row.get(1)?;
            let interval_days: f64 = row.get(2)?;
            Ok((reviewed_at_us, grade_value, interval_days))
        })
        .context("query history")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("decode history rows")?;

    let mut history = Vec::with_capacity(rows.len());
    for (reviewed_at_us, grade_value, interval_days) in rows {
        history.push(ReviewLog {
            reviewed_at: from_micros(reviewed_at_us)?,
            grade: Grade::try_from(grade_value)
                .with_context(|| format!("invalid stored grade {grade_value}"))?,
            interval_days,
        });
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentKind, Item};
    use crate::srs;
    use crate::store::{catalog, open_in_memory};
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).single().expect("valid timestamp")
    }

    fn seed_word(conn: &mut Connection, id: &str, rank: i64, level: Level) {
        let item = Item {
            id: id.to_string(),
            display_text: id.to_string(),
            normalized_text: id.to_ascii_lowercase(),
            rank,
            level,
            kind: ContentKind::for_rank(rank),
            ..Item::default()
        };
        catalog::insert_items(conn, &[item]).expect("seed item");
    }

    #[test]
    fn put_then_get_roundtrips_with_history() {
        let mut conn = open_in_memory().expect("open store");
        seed_word(&mut conn, "ambition", 812, Level::B1);

        let now = fixed_now();
        let graded = srs::advance(&srs::initialize("ambition", now), Grade::Good, now);
        put(&mut conn, &graded).expect("put");

        let loaded = get(&conn, "ambition").expect("get").expect("present");
        assert_eq!(loaded, graded);
        assert_eq!(loaded.history.len(), 1);
        assert!(get(&conn, "unseen").expect("get").is_none());
    }

    #[test]
    fn put_appends_only_new_history_entries() {
        let mut conn = open_in_memory().expect("open store");
        seed_word(&mut conn, "ambition", 812, Level::B1);

        let now = fixed_now();
        let first = srs::advance(&srs::initialize("ambition", now), Grade::Good, now);
        put(&mut conn, &first).expect("first put");

        let second = srs::advance(&first, Grade::Easy, now + Duration::days(1));
        put(&mut conn, &second).expect("second put");

        let log_rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM review_log", [], |row| row.get(0))
            .expect("count log rows");
        assert_eq!(log_rows, 2, "no duplicated history on re-put");

        let loaded = get(&conn, "ambition").expect("get").expect("present");
        assert_eq!(loaded.history, second.history);
    }

    #[test]
    fn due_before_orders_earliest_first_and_skips_new() {
        let mut conn = open_in_memory().expect("open store");
        let now = fixed_now();
        for (id, rank, offset_hours) in [("late", 1, -2), ("early", 2, -30), ("future", 3, 48)] {
            seed_word(&mut conn, id, rank, Level::A1);
            let mut record = srs::advance(&srs::initialize(id, now), Grade::Good, now);
            record.due_at = now + Duration::hours(offset_hours);
            put(&mut conn, &record).expect("put");
        }
        // A still-new record must never count as due.
        seed_word(&mut conn, "fresh", 4, Level::A1);
        put(&mut conn, &srs::initialize("fresh", now)).expect("put new");

        let due = due_before(&conn, now, None).expect("due query");
        let ids: Vec<&str> = due.iter().map(|record| record.item_id.as_str()).collect();
        assert_eq!(ids, ["early", "late"]);
        assert!(due[0].due_at <= due[1].due_at);
    }

    #[test]
    fn due_before_level_filter_joins_catalog() {
        let mut conn = open_in_memory().expect("open store");
        let now = fixed_now();
        for (id, level) in [("easy-one", Level::A1), ("hard-one", Level::C1)] {
            seed_word(&mut conn, id, 10, level);
            let mut record = srs::advance(&srs::initialize(id, now), Grade::Good, now);
            record.due_at = now - Duration::hours(1);
            put(&mut conn, &record).expect("put");
        }

        let due = due_before(&conn, now, Some(Level::C1)).expect("due query");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].item_id, "hard-one");
    }

    #[test]
    fn seen_ids_and_counts_reflect_progress_rows() {
        let mut conn = open_in_memory().expect("open store");
        let now = fixed_now();
        seed_word(&mut conn, "one", 1, Level::A1);
        seed_word(&mut conn, "two", 2, Level::B1);
        seed_word(&mut conn, "unseen", 3, Level::A1);
        put(&mut conn, &srs::initialize("one", now)).expect("put");
        put(&mut conn, &srs::initialize("two", now)).expect("put");

        let ids = seen_ids(&conn).expect("seen ids");
        assert!(ids.contains("one") && ids.contains("two"));
        assert!(!ids.contains("unseen"));

        assert_eq!(count(&conn).expect("count"), 2);
        assert_eq!(count_for_level(&conn, Level::A1).expect("count"), 1);
        assert_eq!(count_for_level(&conn, Level::C2).expect("count"), 0);
    }
}
