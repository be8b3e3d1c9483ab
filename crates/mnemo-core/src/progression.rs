//! XP, level, and day-streak progression state machine.
//!
//! [`ProgressionState`] is an explicit value passed into and returned from
//! [`ProgressionState::record_xp`]; there is no ambient global. Transitions
//! are date- and threshold-driven:
//!
//! - same calendar day: today's XP accumulates
//! - exactly yesterday: the streak continues
//! - any earlier date (or first-ever session): the streak resets to 1
//!
//! The caller supplies the local calendar date; this module never reads the
//! wall clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// XP required to go from level 1 to level 2.
pub const INITIAL_NEXT_LEVEL_XP: u64 = 500;

/// Per-learner progression state (XP, level, streak).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Lifetime XP. Monotonically non-decreasing.
    pub total_xp: u64,
    pub level: u32,
    /// Total-XP threshold for the next level-up. Grows geometrically (x1.5).
    pub next_level_xp: u64,
    pub streak_days: u32,
    /// XP earned on `last_active`. Resets at the day boundary.
    pub xp_today: u64,
    /// Local calendar date of the most recent graded review, if any.
    pub last_active: Option<NaiveDate>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            next_level_xp: INITIAL_NEXT_LEVEL_XP,
            streak_days: 0,
            xp_today: 0,
            last_active: None,
        }
    }
}

impl ProgressionState {
    /// Apply one XP award earned on `today`.
    ///
    /// Returns the next state; `self` is untouched. Level-ups are applied in
    /// a loop so a single large award can jump several levels.
    #[must_use]
    pub fn record_xp(&self, amount: u64, today: NaiveDate) -> Self {
        let yesterday = today.pred_opt();

        let (streak_days, xp_today) = match self.last_active {
            Some(date) if date == today => (self.streak_days, self.xp_today + amount),
            Some(date) if Some(date) == yesterday => (self.streak_days + 1, amount),
            _ => (1, amount),
        };

        let total_xp = self.total_xp + amount;
        let mut level = self.level;
        let mut next_level_xp = self.next_level_xp;
        while total_xp >= next_level_xp {
            level += 1;
            // floor(x * 1.5) without leaving integer arithmetic
            next_level_xp = next_level_xp * 3 / 2;
        }

        Self {
            total_xp,
            level,
            next_level_xp,
            streak_days,
            xp_today,
            last_active: Some(today),
        }
    }

    /// Merge a remote progression snapshot into the local one.
    ///
    /// Opportunistic-sync rule, documented rather than clever: the side
    /// with more lifetime XP supplies XP/level fields, the larger streak
    /// wins, and today's XP follows the later active date. No field-level
    /// CRDT semantics are intended.
    #[must_use]
    pub fn merge(&self, remote: &Self) -> Self {
        let xp_side = if remote.total_xp > self.total_xp {
            remote
        } else {
            self
        };
        let day_side = if remote.last_active > self.last_active {
            remote
        } else {
            self
        };

        Self {
            total_xp: xp_side.total_xp,
            level: xp_side.level,
            next_level_xp: xp_side.next_level_xp,
            streak_days: self.streak_days.max(remote.streak_days),
            xp_today: day_side.xp_today,
            last_active: day_side.last_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn first_session_starts_streak_at_one() {
        let state = ProgressionState::default().record_xp(10, date(2026, 3, 14));
        assert_eq!(state.total_xp, 10);
        assert_eq!(state.streak_days, 1);
        assert_eq!(state.xp_today, 10);
        assert_eq!(state.last_active, Some(date(2026, 3, 14)));
    }

    #[test]
    fn same_day_accumulates_without_touching_streak() {
        let today = date(2026, 3, 14);
        let state = ProgressionState::default()
            .record_xp(10, today)
            .record_xp(15, today);
        assert_eq!(state.streak_days, 1);
        assert_eq!(state.xp_today, 25);
        assert_eq!(state.total_xp, 25);
    }

    #[test]
    fn consecutive_day_extends_streak_and_resets_daily_xp() {
        let state = ProgressionState {
            streak_days: 5,
            xp_today: 40,
            last_active: Some(date(2026, 3, 13)),
            ..ProgressionState::default()
        };

        let next = state.record_xp(10, date(2026, 3, 14));
        assert_eq!(next.streak_days, 6);
        assert_eq!(next.xp_today, 10, "daily XP must not carry over");
    }

    #[test]
    fn gap_breaks_streak_back_to_one() {
        let state = ProgressionState {
            streak_days: 6,
            last_active: Some(date(2026, 3, 11)),
            ..ProgressionState::default()
        };

        let next = state.record_xp(5, date(2026, 3, 14));
        assert_eq!(next.streak_days, 1);
    }

    #[test]
    fn level_up_at_threshold() {
        let state = ProgressionState {
            total_xp: 480,
            level: 1,
            next_level_xp: 500,
            ..ProgressionState::default()
        };

        let next = state.record_xp(30, date(2026, 3, 14));
        assert_eq!(next.total_xp, 510);
        assert_eq!(next.level, 2);
        assert_eq!(next.next_level_xp, 750);
    }

    #[test]
    fn one_award_can_jump_multiple_levels() {
        let next = ProgressionState::default().record_xp(2_000, date(2026, 3, 14));
        // thresholds: 500, 750, 1125, 1687, 2530
        assert_eq!(next.level, 5);
        assert_eq!(next.next_level_xp, 2_530);
    }

    #[test]
    fn threshold_growth_floors_like_the_profile_backend() {
        let next = ProgressionState {
            total_xp: 1_120,
            level: 3,
            next_level_xp: 1_125,
            ..ProgressionState::default()
        };
        let bumped = next.record_xp(5, date(2026, 3, 14));
        assert_eq!(bumped.next_level_xp, 1_687); // floor(1125 * 1.5)
    }

    #[test]
    fn merge_prefers_higher_xp_side() {
        let local = ProgressionState {
            total_xp: 300,
            level: 1,
            next_level_xp: 500,
            streak_days: 9,
            xp_today: 20,
            last_active: Some(date(2026, 3, 13)),
        };
        let remote = ProgressionState {
            total_xp: 900,
            level: 2,
            next_level_xp: 750,
            streak_days: 4,
            xp_today: 35,
            last_active: Some(date(2026, 3, 14)),
        };

        let merged = local.merge(&remote);
        assert_eq!(merged.total_xp, 900);
        assert_eq!(merged.level, 2);
        assert_eq!(merged.streak_days, 9, "larger streak wins");
        assert_eq!(merged.xp_today, 35, "today's XP follows the later date");
        assert_eq!(merged.last_active, Some(date(2026, 3, 14)));
    }

    #[test]
    fn merge_with_default_remote_is_identity() {
        let local = ProgressionState {
            total_xp: 120,
            streak_days: 2,
            xp_today: 30,
            last_active: Some(date(2026, 3, 14)),
            ..ProgressionState::default()
        };
        assert_eq!(local.merge(&ProgressionState::default()), local);
    }
}
