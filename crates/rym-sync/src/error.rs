//! Synchronization error types.

use std::path::PathBuf;

use rym_client::ClientError;
use thiserror::Error;

/// Errors raised by the synchronization engine.
///
/// `Login` and `Discovery` abort a whole run. The others are scoped to one
/// entity and never affect its siblings.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("login failed: {0}")]
    Login(#[source] ClientError),

    #[error("entity discovery failed: {0}")]
    Discovery(#[source] ClientError),

    /// A history page could not be fetched (retries exhausted or an HTTP
    /// error status).
    #[error("fetching history of {entity} failed: {source}")]
    Fetch {
        entity: String,
        #[source]
        source: ClientError,
    },

    /// The checkpoint artifact could not be written.
    #[error("writing {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The task was stopped before it could start synchronizing.
    #[error("synchronization of {0} was cancelled")]
    Cancelled(String),
}

impl SyncError {
    /// Whether the error aborts the whole run rather than a single entity.
    #[must_use]
    pub const fn is_run_scoped(&self) -> bool {
        matches!(self, Self::Login(_) | Self::Discovery(_))
    }
}
