//! Canonical SQLite schema for the mnemo learning store.
//!
//! The schema is normalized for the scheduler's read paths:
//! - `items` holds the immutable seeded catalog
//! - `progress` holds one mutable SRS row per item the learner has seen
//! - `review_log` preserves the append-only grading history
//! - `progression` is the single-row XP/streak state
//! - `store_meta` tracks the applied schema version

/// Migration v1: core tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS items (
    item_id TEXT PRIMARY KEY CHECK (length(trim(item_id)) > 0),
    display_text TEXT NOT NULL,
    normalized_text TEXT NOT NULL,
    rank INTEGER NOT NULL,
    level TEXT NOT NULL DEFAULT 'unleveled'
        CHECK (level IN ('a1', 'a2', 'b1', 'b2', 'c1', 'c2', 'unleveled')),
    kind TEXT NOT NULL CHECK (kind IN ('word', 'phrase', 'phoneme')),
    pronunciation TEXT NOT NULL DEFAULT '',
    translation TEXT NOT NULL DEFAULT '',
    definition TEXT NOT NULL DEFAULT '',
    example TEXT NOT NULL DEFAULT '',
    image_url TEXT
);

CREATE TABLE IF NOT EXISTS progress (
    item_id TEXT PRIMARY KEY REFERENCES items(item_id) ON DELETE CASCADE,
    status TEXT NOT NULL CHECK (status IN ('new', 'learning', 'review', 'graduated')),
    interval_days REAL NOT NULL CHECK (interval_days >= 0),
    ease_factor REAL NOT NULL CHECK (ease_factor >= 1.3),
    consecutive_correct INTEGER NOT NULL CHECK (consecutive_correct >= 0),
    due_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS review_log (
    log_id INTEGER PRIMARY KEY AUTOINCREMENT,
    item_id TEXT NOT NULL REFERENCES progress(item_id) ON DELETE CASCADE,
    reviewed_at_us INTEGER NOT NULL,
    grade INTEGER NOT NULL CHECK (grade BETWEEN 1 AND 4),
    interval_days REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS progression (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_xp INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    next_level_xp INTEGER NOT NULL DEFAULT 500,
    streak_days INTEGER NOT NULL DEFAULT 0,
    xp_today INTEGER NOT NULL DEFAULT 0,
    last_active TEXT
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL
);

INSERT OR IGNORE INTO store_meta (id, schema_version) VALUES (1, 1);
";

/// Migration v2: read-path indexes plus the legacy level backfill.
///
/// Early seed files carried no level metadata, leaving every word
/// `unleveled`. This one-time backfill derives a tier from rank bands for
/// those legacy word rows; items seeded after v2 keep whatever level the
/// seed declares.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_progress_status_due
    ON progress(status, due_at_us ASC);

CREATE INDEX IF NOT EXISTS idx_items_kind_level_rank
    ON items(kind, level, rank ASC);

CREATE INDEX IF NOT EXISTS idx_review_log_item_logged
    ON review_log(item_id, log_id ASC);

UPDATE items
SET level = CASE
    WHEN rank BETWEEN 1 AND 500 THEN 'a1'
    WHEN rank BETWEEN 501 AND 1000 THEN 'a2'
    WHEN rank BETWEEN 1001 AND 1500 THEN 'b1'
    WHEN rank BETWEEN 1501 AND 2000 THEN 'b2'
    WHEN rank BETWEEN 2001 AND 2500 THEN 'c1'
    ELSE 'c2'
END
WHERE kind = 'word' AND level = 'unleveled' AND rank >= 1;

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
";

/// Indexes expected by the due-review and new-candidate query paths.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_progress_status_due",
    "idx_items_kind_level_rank",
    "idx_review_log_item_logged",
];
