//! Persistence for the single-row progression state.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};

use crate::progression::ProgressionState;

/// Load the learner's progression state, or the default for a fresh store.
///
/// # Errors
///
/// Returns an error if the query fails or stored values are corrupt.
pub fn load(conn: &Connection) -> Result<ProgressionState> {
    let row = conn
        .query_row(
            "SELECT total_xp, level, next_level_xp, streak_days, xp_today, last_active
             FROM progression
             WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, Option<String>>(5)?,
                ))
            },
        )
        .optional()
        .context("query progression state")?;

    let Some((total_xp, level, next_level_xp, streak_days, xp_today, last_active)) = row else {
        return Ok(ProgressionState::default());
    };

    let last_active = last_active
        .map(|text| {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .with_context(|| format!("corrupt last_active date '{text}'"))
        })
        .transpose()?;

    Ok(ProgressionState {
        total_xp: u64::try_from(total_xp).context("negative total_xp")?,
        level,
        next_level_xp: u64::try_from(next_level_xp).context("negative next_level_xp")?,
        streak_days,
        xp_today: u64::try_from(xp_today).context("negative xp_today")?,
        last_active,
    })
}

/// Persist the learner's progression state.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save(conn: &Connection, state: &ProgressionState) -> Result<()> {
    conn.execute(
        "INSERT INTO progression (
            id, total_xp, level, next_level_xp, streak_days, xp_today, last_active
         ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            total_xp = excluded.total_xp,
            level = excluded.level,
            next_level_xp = excluded.next_level_xp,
            streak_days = excluded.streak_days,
            xp_today = excluded.xp_today,
            last_active = excluded.last_active",
        params![
            i64::try_from(state.total_xp).context("total_xp overflow")?,
            state.level,
            i64::try_from(state.next_level_xp).context("next_level_xp overflow")?,
            state.streak_days,
            i64::try_from(state.xp_today).context("xp_today overflow")?,
            state.last_active.map(|date| date.format("%Y-%m-%d").to_string()),
        ],
    )
    .context("save progression state")?;
    Ok(())
}
