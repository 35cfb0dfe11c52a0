//! Session establishment.

use crate::{
    RymClient,
    error::ClientError,
    http::{check_response, classify_send_error},
};

impl RymClient {
    /// Log in once; the session cookie is kept by the client for every
    /// later request.
    ///
    /// Not retried: a failed login aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] when the server rejects the credentials
    /// and [`ClientError::Transport`] when it cannot be reached.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let url = format!("{}/application/login", self.base_url);
        let body = format!(
            "username={}&password={}&rememberme=on",
            urlencoding::encode(username),
            urlencoding::encode(password)
        );

        tracing::info!(username, "logging in");
        let resp = self
            .http
            .post(&url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
            .map_err(classify_send_error)?;
        check_response(resp).await?;
        tracing::info!(username, "logged in");
        Ok(())
    }
}
