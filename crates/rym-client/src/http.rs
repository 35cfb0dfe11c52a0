//! Shared HTTP response helpers.
//!
//! The status check (non-success → [`ClientError::Api`]), the
//! classification of send and body-read failures, and JSON decoding.

use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Check an HTTP response status.
///
/// Returns the response unchanged on success. A non-success status becomes
/// [`ClientError::Api`] carrying the status code and the response body.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Map an error from `RequestBuilder::send`.
///
/// Builder errors are programming or configuration mistakes and never
/// transient; everything else happened on the wire.
pub fn classify_send_error(error: reqwest::Error) -> ClientError {
    if error.is_builder() {
        ClientError::Request(error.to_string())
    } else {
        ClientError::Transport(error)
    }
}

/// Read the whole body and decode it as JSON.
pub async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    what: &'static str,
) -> Result<T, ClientError> {
    let body = resp.bytes().await.map_err(classify_send_error)?;
    decode_slice(&body, what)
}

/// Decode a body that has already been read in full.
pub fn decode_slice<T: DeserializeOwned>(
    body: &[u8],
    what: &'static str,
) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|source| ClientError::Decode { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn check_response_api_error_keeps_body() {
        let resp = mock_response(401, "bad credentials");
        let err = check_response(resp).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 401, ref message } if message == "bad credentials"
        ));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn check_response_server_error() {
        let resp = mock_response(500, "");
        let err = check_response(resp).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn check_response_success() {
        let resp = mock_response(200, "");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn decode_json_reports_what_failed() {
        let resp = mock_response(200, "{not json");
        let err = decode_json::<serde_json::Value>(resp, "history page")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode { what: "history page", .. }));
    }

    #[test]
    fn builder_errors_are_not_transient() {
        let error = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let classified = classify_send_error(error);
        assert!(matches!(classified, ClientError::Request(_)));
        assert!(!classified.is_transient());
    }
}
