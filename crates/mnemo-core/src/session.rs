//! Session queue composer.
//!
//! Builds one ordered study session from the catalog and the progress
//! store. The ordering contract is strict:
//!
//! 1. Due reviews come first, earliest-due first — never shuffled.
//! 2. Leftover budget goes to new content, split between phrases and words
//!    by a target mix ratio, with bidirectional backfill when one pool runs
//!    short.
//! 3. Only the new-content portion is shuffled (uniform Fisher-Yates).
//!
//! Queue construction is read-only: the multi-step read sequence runs
//! inside one transaction so a concurrent sync cannot be half-observed,
//! and no progress record is persisted until the learner actually grades.
//!
//! Phonemes never enter the session queue; foundation items are drilled by
//! a dedicated phonetics surface.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::{ContentKind, Item, Level, ParseEnumError, ProgressRecord, Status};
use crate::srs;
use crate::store::{catalog, progress};

/// Target share of the new-content budget given to phrases.
pub const DEFAULT_PHRASE_MIX: f64 = 0.30;

/// What a study session should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Due reviews first, then a word/phrase mix of new content.
    Mixed,
    /// Due reviews only; an empty queue is a valid terminal state.
    Review,
    /// New content only, full limit.
    New,
    /// New content restricted to phrases.
    Phrase,
}

impl SessionMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Mixed => "mixed",
            Self::Review => "review",
            Self::New => "new",
            Self::Phrase => "phrase",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mixed" => Ok(Self::Mixed),
            "review" => Ok(Self::Review),
            "new" => Ok(Self::New),
            "phrase" => Ok(Self::Phrase),
            _ => Err(ParseEnumError {
                expected: "session mode",
                got: s.to_string(),
            }),
        }
    }
}

/// Parameters for one session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    /// Maximum queue length. Zero yields an empty queue.
    pub limit: usize,
    /// Restrict to one difficulty tier; `None` is level-agnostic. Level
    /// gating (which tiers are unlocked) is the caller's concern.
    pub target_level: Option<Level>,
    pub mode: SessionMode,
    /// Target phrase share of the new-content budget.
    pub phrase_mix: f64,
}

impl SessionRequest {
    /// A request with the default phrase mix.
    #[must_use]
    pub const fn new(limit: usize, target_level: Option<Level>, mode: SessionMode) -> Self {
        Self {
            limit,
            target_level,
            mode,
            phrase_mix: DEFAULT_PHRASE_MIX,
        }
    }
}

/// One queue position: a catalog item plus its progress.
///
/// Never-seen items carry a freshly initialized record that exists only in
/// the queue; grading performs the first persistent write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub item: Item,
    pub progress: Option<ProgressRecord>,
}

impl SessionEntry {
    /// Returns `true` when this entry introduces a never-seen item.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.progress
            .as_ref()
            .is_none_or(|progress| progress.status == Status::New)
    }
}

/// Build one ordered study session.
///
/// The whole read sequence runs in a single transaction: a build observes
/// one consistent snapshot of the store, and a mid-build external write
/// lands in the *next* session. The returned queue can be discarded
/// without side effects.
///
/// An empty catalog (or nothing due, in review mode) yields an empty
/// queue, not an error.
///
/// # Errors
///
/// Returns an error only when a store read fails; it is propagated
/// unmodified.
pub fn build_session<R: Rng + ?Sized>(
    conn: &mut Connection,
    request: &SessionRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<SessionEntry>> {
    if request.limit == 0 {
        return Ok(Vec::new());
    }

    let tx = conn.transaction().context("begin session snapshot")?;

    let mut entries = match request.mode {
        SessionMode::New => Vec::new(),
        _ => due_review_entries(&tx, request, now)?,
    };

    if request.mode == SessionMode::Review || entries.len() == request.limit {
        tx.commit().context("close session snapshot")?;
        tracing::debug!(reviews = entries.len(), mode = %request.mode, "session built");
        return Ok(entries);
    }

    let remaining = request.limit - entries.len();
    let new_items = select_new_content(&tx, request, remaining)?;
    tx.commit().context("close session snapshot")?;

    // Reviews stay due-date ordered; only the new tail is shuffled so the
    // learner cannot predict whether the next card is a word or a phrase.
    let mut new_items = new_items;
    new_items.shuffle(rng);

    tracing::debug!(
        reviews = entries.len(),
        new = new_items.len(),
        mode = %request.mode,
        "session built"
    );

    entries.extend(new_items.into_iter().map(|item| {
        let progress = srs::initialize(&item.id, now);
        SessionEntry {
            item,
            progress: Some(progress),
        }
    }));
    Ok(entries)
}

/// Step 1: all due reviews, earliest-due first, truncated to the limit.
fn due_review_entries(
    conn: &Connection,
    request: &SessionRequest,
    now: DateTime<Utc>,
) -> Result<Vec<SessionEntry>> {
    let mut due = progress::due_before(conn, now, request.target_level)?;
    due.truncate(request.limit);

    let mut entries = Vec::with_capacity(due.len());
    for record in due {
        match catalog::get(conn, &record.item_id)? {
            Some(item) => entries.push(SessionEntry {
                item,
                progress: Some(record),
            }),
            None => {
                // Progress without a catalog row: stale sync remnant. Skip
                // rather than abort the whole session.
                tracing::warn!(item_id = %record.item_id, "due progress has no catalog item");
            }
        }
    }
    Ok(entries)
}

/// Steps 3-6: split the leftover budget into phrase/word quotas and
/// backfill either side's shortfall from the other pool.
fn select_new_content(
    conn: &Connection,
    request: &SessionRequest,
    remaining: usize,
) -> Result<Vec<Item>> {
    let (phrase_quota, word_quota) = match request.mode {
        SessionMode::Phrase => (remaining, 0),
        _ => split_quota(remaining, request.phrase_mix),
    };

    // Fetch up to the full budget of each kind so backfill never needs a
    // second query; rank order makes the prefix identical either way.
    let phrase_pool = catalog::new_candidates(
        conn,
        ContentKind::Phrase,
        request.target_level,
        remaining,
    )?;
    let word_pool = if request.mode == SessionMode::Phrase {
        Vec::new()
    } else {
        catalog::new_candidates(conn, ContentKind::Word, request.target_level, remaining)?
    };

    let mut selected: Vec<Item> = Vec::with_capacity(remaining);
    let mut phrases = phrase_pool.into_iter();
    let mut words = word_pool.into_iter();

    selected.extend(phrases.by_ref().take(phrase_quota));
    selected.extend(words.by_ref().take(word_quota));

    // Bidirectional backfill: whichever pool still has items covers the
    // other's shortfall.
    while selected.len() < remaining {
        if let Some(item) = words.next() {
            selected.push(item);
        } else if let Some(item) = phrases.next() {
            selected.push(item);
        } else {
            break;
        }
    }

    Ok(selected)
}

/// Partition a new-content budget into (phrase, word) quotas.
///
/// The phrase quota is floored to at least 1 whenever any budget exists,
/// so a session always offers phrase exposure when phrases are available.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn split_quota(remaining: usize, phrase_mix: f64) -> (usize, usize) {
    if remaining == 0 {
        return (0, 0);
    }

    let raw = (remaining as f64 * phrase_mix.clamp(0.0, 1.0)).round() as usize;
    let phrase_quota = raw.clamp(1, remaining);
    (phrase_quota, remaining - phrase_quota)
}
