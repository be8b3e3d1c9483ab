//! Catalog queries: the immutable, seed-loaded set of learnable items.
//!
//! All functions take a connection reference and return `anyhow::Result`
//! with typed structs (never raw rows). Writes happen only through
//! [`insert_items`], the ingest interface for external seeding tools.

use anyhow::{Context, Result};
use rusqlite::{Connection, Row, params, types::Type};
use std::str::FromStr;

use crate::model::{ContentKind, Item, Level};

/// Bulk-upsert seeded catalog items in one transaction.
///
/// Returns the number of rows written. Existing ids are updated in place
/// (never delete-and-reinsert, which would cascade into progress rows).
///
/// # Errors
///
/// Returns an error if the transaction or any insert fails.
pub fn insert_items(conn: &mut Connection, items: &[Item]) -> Result<usize> {
    let tx = conn.transaction().context("begin catalog insert")?;

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO items (
                    item_id, display_text, normalized_text, rank, level, kind,
                    pronunciation, translation, definition, example, image_url
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                 ON CONFLICT(item_id) DO UPDATE SET
                    display_text = excluded.display_text,
                    normalized_text = excluded.normalized_text,
                    rank = excluded.rank,
                    level = excluded.level,
                    kind = excluded.kind,
                    pronunciation = excluded.pronunciation,
                    translation = excluded.translation,
                    definition = excluded.definition,
                    example = excluded.example,
                    image_url = excluded.image_url",
            )
            .context("prepare catalog insert")?;

        for item in items {
            stmt.execute(params![
                item.id,
                item.display_text,
                item.normalized_text,
                item.rank,
                item.level.to_string(),
                item.kind.to_string(),
                item.pronunciation,
                item.translation,
                item.definition,
                item.example,
                item.image_url,
            ])
            .with_context(|| format!("insert catalog item '{}'", item.id))?;
        }
    }

    tx.commit().context("commit catalog insert")?;
    tracing::debug!(count = items.len(), "seeded catalog items");
    Ok(items.len())
}

/// Fetch one catalog item by id.
///
/// # Errors
///
/// Returns an error if the query fails; an unknown id yields `Ok(None)`.
pub fn get(conn: &Connection, item_id: &str) -> Result<Option<Item>> {
    let mut stmt = conn
        .prepare(
            "SELECT item_id, display_text, normalized_text, rank, level, kind,
                    pronunciation, translation, definition, example, image_url
             FROM items
             WHERE item_id = ?1",
        )
        .context("prepare catalog get")?;

    let mut rows = stmt
        .query_map([item_id], item_from_row)
        .context("query catalog item")?;

    rows.next().transpose().context("decode catalog item")
}

/// Total number of catalog items.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))
        .context("count catalog items")?;
    u64::try_from(count).context("negative catalog count")
}

/// Select new-content candidates of one kind, cheapest rank first.
///
/// Items already present in the progress store are excluded (the join is by
/// explicit item id, never positional). `level = None` is level-agnostic.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn new_candidates(
    conn: &Connection,
    kind: ContentKind,
    level: Option<Level>,
    limit: usize,
) -> Result<Vec<Item>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let collect = |rows: Vec<rusqlite::Result<Item>>| -> Result<Vec<Item>> {
        rows.into_iter()
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("decode new-candidate rows")
    };

    if let Some(level) = level {
        let mut stmt = conn
            .prepare(
                "SELECT item_id, display_text, normalized_text, rank, level, kind,
                        pronunciation, translation, definition, example, image_url
                 FROM items
                 WHERE kind = ?1
                   AND level = ?2
                   AND item_id NOT IN (SELECT item_id FROM progress)
                 ORDER BY rank ASC
                 LIMIT ?3",
            )
            .context("prepare leveled candidate query")?;
        let rows = stmt
            .query_map(
                params![kind.to_string(), level.to_string(), limit],
                item_from_row,
            )
            .context("query leveled candidates")?
            .collect();
        collect(rows)
    } else {
        let mut stmt = conn
            .prepare(
                "SELECT item_id, display_text, normalized_text, rank, level, kind,
                        pronunciation, translation, definition, example, image_url
                 FROM items
                 WHERE kind = ?1
                   AND item_id NOT IN (SELECT item_id FROM progress)
                 ORDER BY rank ASC
                 LIMIT ?2",
            )
            .context("prepare candidate query")?;
        let rows = stmt
            .query_map(params![kind.to_string(), limit], item_from_row)
            .context("query candidates")?
            .collect();
        collect(rows)
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    let level_text: String = row.get(4)?;
    let kind_text: String = row.get(5)?;

    let level = Level::from_str(&level_text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error))
    })?;
    let kind = ContentKind::from_str(&kind_text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(error))
    })?;

    Ok(Item {
        id: row.get(0)?,
        display_text: row.get(1)?,
        normalized_text: row.get(2)?,
        rank: row.get(3)?,
        level,
        kind,
        pronunciation: row.get(6)?,
        translation: row.get(7)?,
        definition: row.get(8)?,
        example: row.get(9)?,
        image_url: row.get(10)?,
    })
}
