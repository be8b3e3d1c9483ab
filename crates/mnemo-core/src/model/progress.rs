use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::grade::Grade;
use super::item::ParseEnumError;

/// Lifecycle states for a learner's per-item memory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Learning,
    Review,
    Graduated,
}

impl Status {
    const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Review => "review",
            Self::Graduated => "graduated",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "learning" => Ok(Self::Learning),
            "review" => Ok(Self::Review),
            "graduated" => Ok(Self::Graduated),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

/// One append-only history entry recorded per graded review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub reviewed_at: DateTime<Utc>,
    pub grade: Grade,
    /// The interval (in days) assigned by this review.
    pub interval_days: f64,
}

/// Mutable per-item learning state.
///
/// A record exists iff the item has been shown at least once; absence from
/// the progress store means "new". `due_at` carries no meaning while
/// `status == Status::New`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub item_id: String,
    pub status: Status,
    pub interval_days: f64,
    pub ease_factor: f64,
    pub consecutive_correct: u32,
    pub due_at: DateTime<Utc>,
    pub history: Vec<ReviewLog>,
}
