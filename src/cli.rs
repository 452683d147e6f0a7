//! CLI command implementations for the duel binary.

pub(crate) mod bots;
pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;
use std::path::Path;
use territory_duel::tournament::TournamentError;
use territory_duel::{ConfigError, GameSettings};

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<TournamentError> for CliError {
    fn from(e: TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

/// Settings from `path` (or the defaults), with the turn override applied.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the resulting
/// settings are invalid.
pub(crate) fn load_settings(path: Option<&Path>, turns: Option<u32>) -> Result<GameSettings, CliError> {
    let mut settings = match path {
        Some(path) => GameSettings::from_json_file(path)?,
        None => GameSettings::default(),
    };
    if let Some(turns) = turns {
        settings = settings.with_max_turns(turns);
    }
    settings.validate()?;
    log::debug!("effective settings: {settings:?}");
    Ok(settings)
}

/// Print `settings` as pretty JSON.
pub(crate) fn show_settings(settings: &GameSettings) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

/// The given seed, or one taken from the clock.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
