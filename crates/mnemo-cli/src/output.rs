//! Shared output layer for human/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its result
//! accordingly: labeled text for humans, stable JSON for scripts. Errors
//! carry the structured code/hint pair from
//! [`mnemo_core::ErrorCode`] in both modes.

use serde::Serialize;
use std::io::{self, Write};

use mnemo_core::{ErrorCode, SchedulerError};

/// The two output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Labeled text for interactive use.
    Human,
    /// Machine-readable JSON (one object or array per command).
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a serializable value to stdout in the requested format.
///
/// In JSON mode, the value is serialized with `serde_json`. In human mode,
/// the provided `human_fn` closure produces the text output.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// A structured error with optional hint and stable error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Machine-readable error code (e.g. "E2001").
    pub error_code: String,
}

impl CliError {
    /// Build from an error code, using its canned message and hint.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            hint: code.hint().map(str::to_string),
            error_code: code.code().to_string(),
        }
    }

    /// Build from an error code with a context-specific message.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: code.hint().map(str::to_string),
            error_code: code.code().to_string(),
        }
    }
}

impl From<&SchedulerError> for CliError {
    fn from(err: &SchedulerError) -> Self {
        Self::with_message(err.code(), err.to_string())
    }
}

/// Marker carried by errors already rendered to stderr, so the top level
/// exits without reporting them a second time.
#[derive(Debug)]
pub struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("error already reported")
    }
}

impl std::error::Error for Reported {}

/// Render `error` to stderr, then hand back a [`Reported`] failure for the
/// caller to propagate.
pub fn report(mode: OutputMode, error: &CliError) -> anyhow::Error {
    match render_error(mode, error) {
        Ok(()) => anyhow::Error::new(Reported),
        Err(render_err) => render_err,
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Human => {
            writeln!(out, "error [{}]: {}", error.error_code, error.message)?;
            if let Some(ref hint) = error.hint {
                writeln!(out, "  hint: {hint}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mode_is_json() {
        assert!(OutputMode::Json.is_json());
        assert!(!OutputMode::Human.is_json());
    }

    #[test]
    fn cli_error_from_code_carries_hint() {
        let err = CliError::from_code(ErrorCode::ItemNotFound);
        assert_eq!(err.error_code, "E2001");
        assert!(err.hint.is_some());
    }

    #[test]
    fn cli_error_custom_message_keeps_code() {
        let err = CliError::with_message(ErrorCode::ItemNotFound, "no item 'ambition'");
        assert_eq!(err.error_code, "E2001");
        assert_eq!(err.message, "no item 'ambition'");
    }

    #[test]
    fn cli_error_from_scheduler_error() {
        let err = SchedulerError::ItemNotFound {
            item_id: "ambition".into(),
        };
        let cli_err = CliError::from(&err);
        assert!(cli_err.message.contains("ambition"));
        assert_eq!(cli_err.error_code, "E2001");
    }

    #[test]
    fn render_json_does_not_panic() {
        #[derive(Serialize)]
        struct Payload {
            count: u32,
        }
        let result = render(OutputMode::Json, &Payload { count: 3 }, |_, _| Ok(()));
        assert!(result.is_ok());
    }

    #[test]
    fn render_human_calls_closure() {
        #[derive(Serialize)]
        struct Payload {
            name: String,
        }
        let mut called = false;
        let result = render(
            OutputMode::Human,
            &Payload { name: "x".into() },
            |p, w| {
                called = true;
                writeln!(w, "name: {}", p.name)
            },
        );
        assert!(result.is_ok());
        assert!(called);
    }

    #[test]
    fn render_error_both_modes() {
        let err = CliError::from_code(ErrorCode::NotInitialized);
        assert!(render_error(OutputMode::Human, &err).is_ok());
        assert!(render_error(OutputMode::Json, &err).is_ok());
    }

    #[test]
    fn report_yields_marker_error() {
        let err = report(
            OutputMode::Human,
            &CliError::from_code(ErrorCode::NotInitialized),
        );
        assert!(err.downcast_ref::<Reported>().is_some());
    }
}
