//
//  domino-environments
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/08/25.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # HTTP Client Facade for the Domino API
//!
//! A thin, uniformly-erroring wrapper over `reqwest`. Every non-2xx response
//! is classified into the [`ApiError`] taxonomy before it reaches a caller:
//! 4xx becomes [`ApiError::Client`], 5xx becomes [`ApiError::Server`], and
//! transport failures become [`ApiError::Network`]. No method hands back a raw
//! failed response.
//!
//! Four response shapes cover every endpoint the library talks to:
//!
//! - JSON bodies ([`DominoClient::get_json`]) for the `/v4` API
//! - Raw bytes ([`DominoClient::get_bytes`]) for revision archive downloads
//! - Text ([`DominoClient::get_text`]) for the HTML build log page
//! - Form submissions ([`DominoClient::post_form`] /
//!   [`DominoClient::post_empty`]) for the legacy creation and archive
//!   endpoints, which answer with redirects rather than JSON

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::ApiError;
use crate::auth::AuthCredential;

/// Extracts a user-friendly message from an error response body.
///
/// The platform usually answers errors with `{"message": "..."}`; some legacy
/// endpoints return plain text or HTML. This function tries the JSON shape
/// first and falls back to the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    body.trim().to_string()
}

/// Classifies a non-2xx response into the error taxonomy.
fn classify_status(status: StatusCode, body: &str) -> ApiError {
    let message = extract_error_message(body);
    if status.is_client_error() {
        ApiError::Client { status, message }
    } else {
        ApiError::Server { status, message }
    }
}

/// Outcome of a successful form submission.
///
/// The legacy creation endpoints answer with a redirect to an HTML page, not
/// JSON, so the useful signal is the final status and URL after redirects.
///
/// # Example
///
/// ```rust,no_run
/// use domino_environments::api::FormResponse;
///
/// fn created_revision_page(response: &FormResponse) -> &str {
///     response.final_url.path()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FormResponse {
    /// The HTTP status of the final response.
    pub status: StatusCode,

    /// The URL the request ended at after following redirects.
    pub final_url: Url,
}

/// The HTTP client facade for a Domino deployment.
///
/// Holds the underlying `reqwest::Client` and the credential applied to every
/// request. URLs are built by the caller (via
/// [`EnvironmentRoutes`](crate::api::EnvironmentRoutes)); this type only
/// dispatches and classifies.
///
/// # Example
///
/// ```rust,no_run
/// use domino_environments::api::DominoClient;
/// use domino_environments::auth::AuthCredential;
///
/// let client = DominoClient::new(AuthCredential::ApiKey {
///     key: "my-api-key".to_string(),
/// })?;
/// # Ok::<(), domino_environments::api::ApiError>(())
/// ```
pub struct DominoClient {
    /// The underlying HTTP client.
    http: Client,
    /// Credential applied to every request.
    auth: AuthCredential,
}

impl DominoClient {
    /// Creates a client with the given credential.
    ///
    /// The client sends a `domino-environments/<version>` User-Agent and
    /// follows redirects, which the legacy form endpoints rely on.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(auth: AuthCredential) -> Result<Self, ApiError> {
        Ok(Self {
            http: Client::builder()
                .user_agent(format!("domino-environments/{}", crate::VERSION))
                .build()?,
            auth,
        })
    }

    fn authed_get(&self, url: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        self.auth.apply_to_request(self.http.get(url))
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Type Parameters
    ///
    /// * `T` - The type to deserialize the response JSON into.
    ///
    /// # Errors
    ///
    /// [`ApiError::Client`] / [`ApiError::Server`] for non-2xx responses,
    /// [`ApiError::Network`] for transport failures, and
    /// [`ApiError::UnexpectedResponse`] when the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(%url, "GET (json)");
        let response = self.authed_get(url)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::UnexpectedResponse(format!("{url}: {e}")))
    }

    /// Makes a GET request and returns the raw response body.
    ///
    /// Used for revision archive downloads, which are tar streams.
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(%url, "GET (bytes)");
        let response = self.authed_get(url)?.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Makes a GET request and returns the response body as text.
    ///
    /// Used for the HTML build log page.
    pub async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        tracing::debug!(%url, "GET (text)");
        let response = self.authed_get(url)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        Ok(body)
    }

    /// Submits an `application/x-www-form-urlencoded` POST request.
    ///
    /// Pair order is preserved on the wire; the legacy endpoints parse
    /// indexed fields positionally.
    ///
    /// # Parameters
    ///
    /// * `url` - The form endpoint URL.
    /// * `payload` - Ordered key/value pairs to encode.
    ///
    /// # Returns
    ///
    /// A [`FormResponse`] carrying the final status and URL after redirects.
    pub async fn post_form(
        &self,
        url: &str,
        payload: &[(String, String)],
    ) -> Result<FormResponse, ApiError> {
        tracing::debug!(%url, fields = payload.len(), "POST (form)");
        let request = self.http.post(url).form(payload);
        let response = self.auth.apply_to_request(request)?.send().await?;
        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        Ok(FormResponse { status, final_url })
    }

    /// Makes a bodyless POST request.
    ///
    /// Used for the environment archive endpoint.
    pub async fn post_empty(&self, url: &str) -> Result<(), ApiError> {
        tracing::debug!(%url, "POST (empty)");
        let request = self.http.post(url);
        let response = self.auth.apply_to_request(request)?.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_prefers_json() {
        assert_eq!(
            extract_error_message(r#"{"message": "Environment not found"}"#),
            "Environment not found"
        );
        assert_eq!(extract_error_message("plain failure\n"), "plain failure");
    }

    #[test]
    fn test_classify_splits_client_and_server() {
        match classify_status(StatusCode::NOT_FOUND, "missing") {
            ApiError::Client { status, message } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "missing");
            }
            other => panic!("expected Client, got {other:?}"),
        }
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "oops"),
            ApiError::Server { .. }
        ));
    }
}
