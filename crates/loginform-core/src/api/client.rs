//! API client for the login endpoint.
//!
//! This module provides the `ApiClient` struct for posting credentials to
//! the page origin and decoding the issued token.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::auth::Credentials;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Path of the login endpoint, relative to the page origin
pub const LOGIN_PATH: &str = "/login";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Reply body of a successful login. Only `token` is read.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

/// API client bound to one page origin.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    origin: Url,
}

impl ApiClient {
    /// Create a new API client for the given origin (e.g. `http://localhost:8080`)
    pub fn new(origin: &str, timeout: Duration) -> Result<Self> {
        let origin = Url::parse(origin)
            .with_context(|| format!("Invalid origin URL: {}", origin))?;
        if origin.cannot_be_a_base() {
            anyhow::bail!("Origin URL cannot be used as a base: {}", origin);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, origin })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Resolve a path such as `/login` against the origin
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.origin
            .join(path)
            .with_context(|| format!("Failed to resolve {} against {}", path, self.origin))
    }

    /// Post credentials to `/login` and decode the issued token.
    ///
    /// A non-ok status is returned as an [`ApiError`] carrying the status.
    /// Transport failures and undecodable bodies are returned as plain
    /// errors with context.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!(url = %url, email = %credentials.email, "Sending login request");

        let response = self
            .client
            .post(url)
            .json(credentials)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;

        response
            .json::<AuthResponse>()
            .await
            .context("Failed to parse login response")
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "Login request rejected");
            Err(ApiError::from_status(status, &body).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(origin: &str) -> ApiClient {
        ApiClient::new(origin, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
            .expect("Failed to build test client")
    }

    #[test]
    fn test_endpoint_resolves_against_origin() {
        let api = client("http://localhost:8080");
        assert_eq!(
            api.endpoint(LOGIN_PATH).unwrap().as_str(),
            "http://localhost:8080/login"
        );

        // An absolute path replaces whatever path the page was served from
        let api = client("https://shop.example.com/static/login.html");
        assert_eq!(
            api.endpoint("/dashboard").unwrap().as_str(),
            "https://shop.example.com/dashboard"
        );
    }

    #[test]
    fn test_rejects_invalid_origin() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_parse_auth_response() {
        let resp: AuthResponse = serde_json::from_str(r#"{"token":"abc123","user":{"id":7}}"#)
            .expect("Failed to parse auth response JSON");
        assert_eq!(resp.token, "abc123");

        assert!(serde_json::from_str::<AuthResponse>(r#"{"user":{"id":7}}"#).is_err());
        assert!(serde_json::from_str::<AuthResponse>(r#"{"token":42}"#).is_err());
    }
}
