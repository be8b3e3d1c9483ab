use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Catalog ranks at or above this value denote multi-word phrases.
pub const PHRASE_RANK_MIN: i64 = 10_000;

/// The three kinds of learnable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Word,
    Phrase,
    Phoneme,
}

impl ContentKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Phrase => "phrase",
            Self::Phoneme => "phoneme",
        }
    }

    /// Derive the content kind from a catalog rank.
    ///
    /// Negative ranks are phonetic/foundation items, ranks at or above
    /// [`PHRASE_RANK_MIN`] are phrases, everything in between is a word.
    #[must_use]
    pub const fn for_rank(rank: i64) -> Self {
        if rank < 0 {
            Self::Phoneme
        } else if rank >= PHRASE_RANK_MIN {
            Self::Phrase
        } else {
            Self::Word
        }
    }
}

/// CEFR difficulty tiers, ordered easiest to hardest.
///
/// `Unleveled` sorts after every concrete tier and matches no level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Unleveled,
}

impl Level {
    const fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "a1",
            Self::A2 => "a2",
            Self::B1 => "b1",
            Self::B2 => "b2",
            Self::C1 => "c1",
            Self::C2 => "c2",
            Self::Unleveled => "unleveled",
        }
    }

    /// All concrete tiers in ascending difficulty order.
    pub const TIERS: [Self; 6] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1, Self::C2];
}

/// An immutable catalog record for one learnable item.
///
/// Presentation assets (pronunciation, translation, definition, example,
/// image) are opaque payload carried through to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub id: String,
    pub display_text: String,
    pub normalized_text: String,
    pub rank: i64,
    pub level: Level,
    pub kind: ContentKind,
    pub pronunciation: String,
    pub translation: String,
    pub definition: String,
    pub example: String,
    pub image_url: Option<String>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_text: String::new(),
            normalized_text: String::new(),
            rank: 0,
            level: Level::Unleveled,
            kind: ContentKind::Word,
            pronunciation: String::new(),
            translation: String::new(),
            definition: String::new(),
            example: String::new(),
            image_url: None,
        }
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for ContentKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "word" => Ok(Self::Word),
            "phrase" => Ok(Self::Phrase),
            "phoneme" => Ok(Self::Phoneme),
            _ => Err(ParseEnumError {
                expected: "content kind",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Level {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "a1" => Ok(Self::A1),
            "a2" => Ok(Self::A2),
            "b1" => Ok(Self::B1),
            "b2" => Ok(Self::B2),
            "c1" => Ok(Self::C1),
            "c2" => Ok(Self::C2),
            "unleveled" | "n/a" => Ok(Self::Unleveled),
            _ => Err(ParseEnumError {
                expected: "level",
                got: s.to_string(),
            }),
        }
    }
}
