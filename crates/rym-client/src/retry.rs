//! Bounded fixed-delay retry for transport failures.
//!
//! Only [`ClientError::Transport`] is retried. Anything else (an HTTP
//! status, a decode failure) is returned from the first attempt that
//! produced it.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Retry budget for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never less than 1.
    pub attempts: u32,
    /// Pause between two attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 9,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }
}

/// Run `op` until it succeeds, fails with a non-transient error, or the
/// policy's attempts are used up.
///
/// Each failed attempt that will be retried logs a warning. Running out of
/// attempts logs an error and returns [`ClientError::RetriesExhausted`]
/// wrapping the last transport error.
///
/// # Errors
///
/// Returns the first non-transient error unchanged, or
/// [`ClientError::RetriesExhausted`].
pub async fn with_retry<T, F, Fut>(
    policy: RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if !error.is_transient() => return Err(error),
            Err(error) if attempt >= attempts => {
                tracing::error!(
                    what,
                    attempts,
                    %error,
                    "giving up after repeated transport errors"
                );
                return Err(ClientError::RetriesExhausted {
                    attempts,
                    last: Box::new(error),
                });
            }
            Err(error) => {
                tracing::warn!(
                    what,
                    attempt,
                    delay_ms = u64::try_from(policy.delay.as_millis()).unwrap_or(u64::MAX),
                    %error,
                    "transport error, will retry"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
