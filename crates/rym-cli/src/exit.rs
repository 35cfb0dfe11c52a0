//! Process exit codes.

use rym_config::ConfigError;
use rym_core::CoreError;
use rym_sync::SyncError;

/// Raised by `rym sync` when at least one entity failed.
#[derive(Debug, thiserror::Error)]
#[error("{failed} of {attempted} entities failed to synchronize")]
pub struct PartialSync {
    pub failed: usize,
    pub attempted: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitCode {
    Failure = 1,
    Config = 2,
    Auth = 3,
    Discovery = 4,
    Partial = 5,
}

impl ExitCode {
    /// Classify an error by the first typed cause in its chain.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if cause.is::<ConfigError>() || cause.is::<CoreError>() {
                return Self::Config;
            }
            if cause.is::<PartialSync>() {
                return Self::Partial;
            }
            if let Some(sync) = cause.downcast_ref::<SyncError>() {
                return match sync {
                    SyncError::Login(_) => Self::Auth,
                    SyncError::Discovery(_) => Self::Discovery,
                    _ => Self::Partial,
                };
            }
        }
        Self::Failure
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}
