//! mnemo-core: the adaptive review scheduler behind the mnemo vocabulary app.
//!
//! - [`srs`] — pure SM-2 review algorithm
//! - [`session`] — session queue composer
//! - [`store`] — SQLite catalog/progress/progression stores
//! - [`progression`] — XP, level, and streak state machine
//! - [`scheduler`] — the grading seam tying the above together
//!
//! # Conventions
//!
//! - **Errors**: `anyhow::Result` with context at I/O seams; typed
//!   [`error::SchedulerError`] where callers must branch on the cause.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Time**: callers supply `DateTime<Utc>` / `NaiveDate`; the core
//!   never reads the wall clock.

pub mod config;
pub mod error;
pub mod model;
pub mod progression;
pub mod scheduler;
pub mod session;
pub mod srs;
pub mod store;

pub use config::StudyConfig;
pub use error::{ErrorCode, SchedulerError};
pub use model::{ContentKind, Grade, Item, Level, ProgressRecord, ReviewLog, Status};
pub use progression::ProgressionState;
pub use scheduler::{GradeOutcome, grade_item};
pub use session::{SessionEntry, SessionMode, SessionRequest, build_session};
