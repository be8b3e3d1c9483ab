//! Shared data model: catalog items, grades, and per-item progress state.

pub mod grade;
pub mod item;
pub mod progress;

pub use grade::Grade;
pub use item::{ContentKind, Item, Level, ParseEnumError, PHRASE_RANK_MIN};
pub use progress::{ProgressRecord, ReviewLog, Status};
