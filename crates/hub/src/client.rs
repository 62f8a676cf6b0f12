//! REST API client for the JupyterHub hub endpoints.
//!
//! Wraps the four administrative calls the backend needs (create user,
//! start/stop a user's server, mint a user access token) using [`reqwest`].
//! Every call authenticates with the service-level API token, not the end
//! user's credentials.

use std::time::Duration;

use serde::Deserialize;

/// Timeout for user and token management calls.
const ADMIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for server spawn/stop calls, which can block while the hub
/// schedules the single-user server.
const SERVER_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a single JupyterHub deployment.
pub struct HubClient {
    client: reqwest::Client,
    api_url: String,
    api_token: String,
}

/// Response body of `POST /hub/api/users/{name}/tokens`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Errors from the JupyterHub REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// JupyterHub returned a non-2xx status code.
    #[error("JupyterHub API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body did not contain what we asked for.
    #[error("Malformed JupyterHub response: {0}")]
    MalformedResponse(String),
}

impl HubError {
    /// Whether the caller can reasonably treat this failure as transient and
    /// carry on: the hub was unreachable or failing internally, not rejecting
    /// the request outright.
    pub fn is_transient(&self) -> bool {
        match self {
            HubError::Transport(_) => true,
            HubError::Api { status, .. } => *status >= 500,
            HubError::MalformedResponse(_) => false,
        }
    }
}

impl HubClient {
    /// Create a client for a JupyterHub deployment.
    ///
    /// * `api_url`   - Base URL of the hub, e.g. `http://hub:8000`.
    /// * `api_token` - Service-level API token with admin scope.
    pub fn new(api_url: String, api_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Base URL of the hub API this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Create the hub-side user if it does not exist.
    ///
    /// `POST /hub/api/users/{name}`. The hub answers 409 for an existing
    /// user, which is fine -- the status is logged but not checked. Only a
    /// transport failure is an error.
    pub async fn ensure_user(&self, username: &str) -> Result<(), HubError> {
        let response = self
            .client
            .post(format!("{}/hub/api/users/{username}", self.api_url))
            .header("Authorization", format!("token {}", self.api_token))
            .json(&serde_json::json!({ "admin": false }))
            .timeout(ADMIN_TIMEOUT)
            .send()
            .await?;

        tracing::debug!(
            username,
            status = response.status().as_u16(),
            "Ensured hub user exists"
        );
        Ok(())
    }

    /// Request a spawn of the user's single-user server.
    ///
    /// `POST /hub/api/users/{name}/server`. A 400 means the server is
    /// already running (or a spawn is pending) and is reported as success.
    pub async fn start_server(&self, username: &str) -> Result<(), HubError> {
        let response = self
            .client
            .post(format!("{}/hub/api/users/{username}/server", self.api_url))
            .header("Authorization", format!("token {}", self.api_token))
            .timeout(SERVER_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 {
            tracing::debug!(username, "Hub server already running or spawn pending");
            return Ok(());
        }
        Self::check_status(response).await
    }

    /// Request a stop of the user's single-user server.
    ///
    /// `DELETE /hub/api/users/{name}/server`. A 400 or 404 means there is no
    /// running server to stop and is reported as success.
    pub async fn stop_server(&self, username: &str) -> Result<(), HubError> {
        let response = self
            .client
            .delete(format!("{}/hub/api/users/{username}/server", self.api_url))
            .header("Authorization", format!("token {}", self.api_token))
            .timeout(SERVER_TIMEOUT)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status == 400 || status == 404 {
            tracing::debug!(username, status, "No running hub server to stop");
            return Ok(());
        }
        Self::check_status(response).await
    }

    /// Mint a fresh JupyterHub access token for the user.
    ///
    /// `POST /hub/api/users/{name}/tokens`. Unlike the server calls this is
    /// on the success-critical SSO path, so a ≥400 status or an unparseable
    /// body is always an error.
    pub async fn create_user_token(&self, username: &str) -> Result<String, HubError> {
        let body = serde_json::json!({
            "note": "Auto-generated token for backend access",
            "expires_in": 86400,
        });

        let response = self
            .client
            .post(format!("{}/hub/api/users/{username}/tokens", self.api_url))
            .header("Authorization", format!("token {}", self.api_token))
            .json(&body)
            .timeout(ADMIN_TIMEOUT)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| HubError::MalformedResponse(format!("invalid JSON body: {e}")))?;

        match parsed.token {
            Some(token) => {
                tracing::debug!(username, "Created hub access token");
                Ok(token)
            }
            None => Err(HubError::MalformedResponse(
                "response did not contain a token".to_string(),
            )),
        }
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the response
    /// unchanged on success, or a [`HubError::Api`] containing the status and
    /// body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, HubError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(HubError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), HubError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
