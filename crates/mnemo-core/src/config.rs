use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::session::DEFAULT_PHRASE_MIX;

/// Learner-tunable study settings, loaded from `config.toml`.
///
/// Every field has a default so a missing file or a partial file both
/// work; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Default session length when `--limit` is not given.
    #[serde(default = "default_session_limit")]
    pub session_limit: usize,
    /// Target phrase share of new content in mixed sessions.
    #[serde(default = "default_phrase_mix")]
    pub phrase_mix: f64,
    /// Daily XP target surfaced by `mn stats`.
    #[serde(default = "default_daily_goal_xp")]
    pub daily_goal_xp: u64,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            session_limit: default_session_limit(),
            phrase_mix: default_phrase_mix(),
            daily_goal_xp: default_daily_goal_xp(),
        }
    }
}

const fn default_session_limit() -> usize {
    10
}

const fn default_phrase_mix() -> f64 {
    DEFAULT_PHRASE_MIX
}

const fn default_daily_goal_xp() -> u64 {
    50
}

/// The default per-user config path (`<config dir>/mnemo/config.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mnemo/config.toml"))
}

/// Load the study config from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<StudyConfig> {
    if !path.exists() {
        return Ok(StudyConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<StudyConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the study config from the default per-user location.
///
/// # Errors
///
/// Returns an error if an existing config file cannot be read or parsed.
pub fn load_config() -> Result<StudyConfig> {
    match default_config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(StudyConfig::default()),
    }
}
