use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::item::ParseEnumError;

/// Self-reported recall quality for one graded review.
///
/// The numeric values (1..=4) feed the SM-2 ease-factor formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Grade {
    Again = 1,
    Hard = 2,
    Good = 3,
    Easy = 4,
}

impl Grade {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Again => "again",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }

    /// The SM-2 quality value `q` in `1..=4`.
    #[must_use]
    pub const fn quality(self) -> u8 {
        self as u8
    }

    /// XP awarded for one review at this grade.
    ///
    /// These values are fixed: milestone and achievement thresholds in the
    /// presentation layer are calibrated against them.
    #[must_use]
    pub const fn xp_reward(self) -> u64 {
        match self {
            Self::Again | Self::Hard => 5,
            Self::Good => 10,
            Self::Easy => 15,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Grade {
    type Error = ParseEnumError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Again),
            2 => Ok(Self::Hard),
            3 => Ok(Self::Good),
            4 => Ok(Self::Easy),
            _ => Err(ParseEnumError {
                expected: "grade",
                got: value.to_string(),
            }),
        }
    }
}

impl FromStr for Grade {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" | "1" => Ok(Self::Again),
            "hard" | "2" => Ok(Self::Hard),
            "good" | "3" => Ok(Self::Good),
            "easy" | "4" => Ok(Self::Easy),
            _ => Err(ParseEnumError {
                expected: "grade",
                got: s.to_string(),
            }),
        }
    }
}
