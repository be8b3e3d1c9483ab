use std::fmt;

use thiserror::Error;

/// Machine-readable error codes surfaced through CLI exit diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    ItemNotFound,
    InvalidEnumValue,
    CorruptStore,
    StoreUnavailable,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::ItemNotFound => "E2001",
            Self::InvalidEnumValue => "E2002",
            Self::CorruptStore => "E3001",
            Self::StoreUnavailable => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Data directory not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::ItemNotFound => "Catalog item not found",
            Self::InvalidEnumValue => "Invalid level/kind/grade value",
            Self::CorruptStore => "Corrupt learning store",
            Self::StoreUnavailable => "Learning store unavailable",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to the learner.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `mn init` to create the learning store."),
            Self::ConfigParseError => Some("Fix syntax in config.toml and retry."),
            Self::ItemNotFound => Some("Check the item id, or re-run `mn seed`."),
            Self::InvalidEnumValue => Some("Use one of the documented level/kind/grade values."),
            Self::CorruptStore => Some("Restore the store from a backup, or re-initialize."),
            Self::StoreUnavailable => Some("Check disk space and file permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Typed failures at the grading seam.
///
/// Callers must be able to distinguish a rejected item id from storage
/// failure; everything else in the core propagates as `anyhow` context.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Grading was requested for an id with no catalog entry. The scheduler
    /// refuses to initialize progress for nonexistent items.
    #[error("no catalog entry for item '{item_id}'")]
    ItemNotFound { item_id: String },

    #[error("learning store operation failed")]
    Store(#[from] anyhow::Error),
}

impl SchedulerError {
    /// Map this failure to its stable [`ErrorCode`].
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            Self::Store(_) => ErrorCode::StoreUnavailable,
        }
    }
}
