//! Cross-cutting error types for rym.
//!
//! Domain-specific errors (`ConfigError`, `ClientError`, `SyncError`) live in
//! their respective crates. They converge into `anyhow` in `rym-cli`.

use thiserror::Error;

/// Errors that can be raised while building core values from operator input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity kind keyword was not one of `user`, `team`, `forum`.
    #[error("unknown entity kind '{0}' (expected one of: forum, team, user)")]
    UnknownKind(String),

    /// An ignore rule did not follow `<kind>=<id>`.
    #[error("invalid ignore rule '{rule}': {reason}")]
    InvalidIgnoreRule { rule: String, reason: String },
}
