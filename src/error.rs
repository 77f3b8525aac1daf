//! Error types
//!
//! Only configuration can fail. Lookup misses and illegal moves are reported
//! as `None`/no-op results by the board, never as errors.

use thiserror::Error;

/// Errors raised while reading or validating a board configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration is not valid JSON or has the wrong shape
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field required by the selected puzzle type is absent
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but its value cannot produce a board
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
