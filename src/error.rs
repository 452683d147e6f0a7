//! Error types for the duel engine.
//!
//! Nothing that happens inside a match is fatal: policy failures, shortfalls
//! and unknown command keys are all recovered and traced. The errors here
//! cover the edges of the crate, where settings are loaded and series of
//! matches are set up.

use std::path::PathBuf;

use thiserror::Error;

/// A settings object that cannot be used for a match.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings document is not valid JSON for [`GameSettings`](crate::GameSettings).
    #[error("invalid settings document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A parameter combination that would break the pricing model.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// A strategy that failed to produce a command for a turn.
///
/// The engine never propagates this: the failing side plays an empty
/// command for that turn and the match continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The strategy reported a failure of its own.
    #[error("strategy failed: {0}")]
    Failed(String),
    /// The strategy panicked while deciding.
    #[error("strategy panicked: {0}")]
    Panicked(String),
    /// The strategy returned something other than a mapping.
    #[error("strategy must return a mapping, got {0}")]
    NotAMapping(&'static str),
}

impl PolicyError {
    /// Build a [`PolicyError::Failed`] from any message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = ConfigError::InvalidParameter {
            name: "expand_base",
            reason: "must be positive",
        };
        let msg = format!("{err}");
        assert!(msg.contains("expand_base"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_policy_error_display() {
        assert_eq!(
            PolicyError::failed("boom").to_string(),
            "strategy failed: boom"
        );
        assert!(PolicyError::NotAMapping("array").to_string().contains("array"));
    }
}
