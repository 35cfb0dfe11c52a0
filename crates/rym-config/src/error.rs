//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A required configuration field is empty.
    #[error("Configuration field '{field}' is required but not set")]
    Missing { field: String },

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// An ignore rule in the configuration is malformed.
    #[error(transparent)]
    IgnoreRule(#[from] rym_core::CoreError),
}
