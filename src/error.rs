//! Error types for Espresso Dash

use thiserror::Error;

use crate::sim::Phase;

/// Configuration rejected at construction time
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Best-record store failure. Never fatal to a session.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record store data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Phase machine misuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot {action} while in {phase}")]
    InvalidTransition { action: &'static str, phase: Phase },
}
