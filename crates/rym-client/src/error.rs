//! Client error types.

use thiserror::Error;

/// Errors that can occur when talking to the chat server.
///
/// [`ClientError::Transport`] is the only transient class: it is raised
/// before any response arrives and is the only error the retry loop retries.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection failure, timeout, or a body that could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request could not be built (bad URL, bad header).
    #[error("invalid request: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body, possibly empty.
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Every attempt of a retried request failed at the transport level.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<ClientError>,
    },
}

impl ClientError {
    /// Whether the error is a transport failure worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// HTTP status, when the server answered with one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
