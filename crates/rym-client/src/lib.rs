//! # rym-client
//!
//! HTTP client for the chat server's OData API:
//! - session establishment (form login, cookie-carried session)
//! - entity discovery (`Ryver.Info()`)
//! - chat history pages (`Chat.History()`), with bounded retry of transport
//!   failures
//!
//! One [`RymClient`] holds the authenticated session and is shared by every
//! entity synchronizer of a run. It is logically stateless per call.

pub mod catalog;
pub mod history;
pub mod retry;
pub mod session;

mod error;
mod http;

pub use error::ClientError;
pub use history::Page;
pub use retry::{RetryPolicy, with_retry};

use rym_core::PageCursor;
use std::time::Duration;

/// Settings for building a [`RymClient`].
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    /// Per-request timeout applied by the HTTP client.
    pub timeout: Duration,
    /// Retry budget for history page requests.
    pub retry: RetryPolicy,
    /// Which message of a page becomes the next cursor.
    pub page_cursor: PageCursor,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            page_cursor: PageCursor::default(),
        }
    }
}

/// HTTP client bound to one chat server.
#[derive(Debug, Clone)]
pub struct RymClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
    page_cursor: PageCursor,
}

impl RymClient {
    /// Create a client for `https://<domain>`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] if the underlying HTTP client cannot
    /// be built.
    pub fn new(domain: &str, options: ClientOptions) -> Result<Self, ClientError> {
        Self::with_base_url(&format!("https://{domain}"), options)
    }

    /// Create a client against an explicit base URL (scheme + host + port).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] if the underlying HTTP client cannot
    /// be built.
    pub fn with_base_url(base_url: &str, options: ClientOptions) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("rym/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: options.retry,
            page_cursor: options.page_cursor,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Root of the OData service.
    fn odata_root(&self) -> String {
        format!("{}/api/1/odata.svc", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn domain_becomes_https_base() {
        let client = RymClient::new("acme.ryver.com", ClientOptions::default()).unwrap();
        assert_eq!(client.base_url(), "https://acme.ryver.com");
        assert_eq!(
            client.odata_root(),
            "https://acme.ryver.com/api/1/odata.svc"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client =
            RymClient::with_base_url("http://127.0.0.1:8080/", ClientOptions::default()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn default_options_match_retry_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.retry.attempts, 9);
        assert_eq!(options.retry.delay, Duration::from_secs(1));
    }
}
