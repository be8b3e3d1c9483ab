//! SM-2 variant review algorithm.
//!
//! Pure functions over [`ProgressRecord`]: no I/O, no clock access, fully
//! deterministic. The caller supplies `now` and persists the result.
//!
//! # Schedule rules
//!
//! - `Again` resets the correct streak and schedules a sub-day re-review.
//! - Otherwise the interval ladder is 1 day, 6 days, then
//!   `round(interval * ease)`.
//! - Ease is adjusted on every grade by the SM-2 formula and floored at
//!   [`MIN_EASE`] to prevent runaway interval shrinkage.
//! - A record graduates once its interval exceeds [`GRADUATION_INTERVAL_DAYS`].

use chrono::{DateTime, Duration, Utc};

use crate::model::{Grade, ProgressRecord, ReviewLog, Status};

/// Ease factor assigned to a freshly initialized record.
pub const INITIAL_EASE: f64 = 2.5;

/// Hard floor for the ease factor.
pub const MIN_EASE: f64 = 1.3;

/// Interval assigned on `Again` (~10 minutes, expressed in days).
pub const AGAIN_INTERVAL_DAYS: f64 = 0.007;

/// Interval after the first correct answer.
pub const FIRST_INTERVAL_DAYS: f64 = 1.0;

/// Interval after the second consecutive correct answer.
pub const SECOND_INTERVAL_DAYS: f64 = 6.0;

/// Intervals strictly above this many days mark the record graduated.
pub const GRADUATION_INTERVAL_DAYS: f64 = 21.0;

/// Create the progress record for an item being shown for the first time.
#[must_use]
pub fn initialize(item_id: &str, now: DateTime<Utc>) -> ProgressRecord {
    ProgressRecord {
        item_id: item_id.to_string(),
        status: Status::New,
        interval_days: 0.0,
        ease_factor: INITIAL_EASE,
        consecutive_correct: 0,
        due_at: now,
        history: Vec::new(),
    }
}

/// Compute the next progress state after one graded review.
///
/// Returns a new record; `current` is untouched. History is append-only
/// here — retention policy, if any, belongs to the progress store.
#[must_use]
pub fn advance(current: &ProgressRecord, grade: Grade, now: DateTime<Utc>) -> ProgressRecord {
    let (interval_days, consecutive_correct) = match grade {
        Grade::Again => (AGAIN_INTERVAL_DAYS, 0),
        _ => {
            let interval = match current.consecutive_correct {
                0 => FIRST_INTERVAL_DAYS,
                1 => SECOND_INTERVAL_DAYS,
                _ => (current.interval_days * current.ease_factor).round(),
            };
            (interval, current.consecutive_correct + 1)
        }
    };

    let ease_factor = next_ease(current.ease_factor, grade);

    let status = if interval_days > GRADUATION_INTERVAL_DAYS {
        Status::Graduated
    } else if grade == Grade::Again {
        Status::Learning
    } else {
        Status::Review
    };

    let mut history = current.history.clone();
    history.push(ReviewLog {
        reviewed_at: now,
        grade,
        interval_days,
    });

    ProgressRecord {
        item_id: current.item_id.clone(),
        status,
        interval_days,
        ease_factor,
        consecutive_correct,
        due_at: now + days_to_duration(interval_days),
        history,
    }
}

/// SM-2 ease update: `e' = e + (0.1 - (5-q)(0.08 + (5-q)*0.02))`, floored.
///
/// Applied on every grade, including `Again`.
#[must_use]
pub fn next_ease(ease: f64, grade: Grade) -> f64 {
    let q = f64::from(grade.quality());
    let adjusted = ease + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    adjusted.max(MIN_EASE)
}

/// Convert a fractional day count to a chrono duration.
#[allow(clippy::cast_possible_truncation)]
fn days_to_duration(days: f64) -> Duration {
    Duration::milliseconds((days * 86_400_000.0) as i64)
}
