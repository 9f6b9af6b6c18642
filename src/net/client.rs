//! Authenticated request client for the marketplace API.
//!
//! Every request reads the current token from the shared `SessionState`
//! and, when one is present, sends it as `Authentication-Token`. The client
//! never retries and never interprets failures beyond classifying them;
//! callers decide what a failure means.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ApiError, LoginRequest, LoginResponse, MessageResponse, NewService, Service};
use crate::config::ClientConfig;
use crate::state::session::{SessionState, parse_roles};

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

pub const AUTH_HEADER: &str = "Authentication-Token";

// =============================================================================
// READ SEAM
// =============================================================================

/// Read-only JSON access to the API. Enables mocking in fetcher tests.
#[async_trait::async_trait]
pub trait ApiGet: Send + Sync {
    async fn get_value(&self, path: &str) -> Result<serde_json::Value, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionState>,
}

impl ApiClient {
    /// Build a client with the configured base URL and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, session: Arc<SessionState>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_owned(), session })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.header(AUTH_HEADER, token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder, path: &str) -> Result<String, ApiError> {
        let response = builder.send().await.map_err(|e| transport_error(path, &e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(path, &e))?;

        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "api request rejected");
            return Err(ApiError::Status { path: path.to_owned(), status: status.as_u16(), body });
        }
        Ok(body)
    }

    /// `GET path`, decoding the JSON body as `T`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or decode failure unmodified.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.send(self.request(reqwest::Method::GET, path), path).await?;
        decode(path, &body)
    }

    /// `POST path` with a JSON body, decoding the JSON response as `T`.
    ///
    /// # Errors
    ///
    /// Returns the transport, status, or decode failure unmodified.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let builder = self.request(reqwest::Method::POST, path).json(body);
        let body = self.send(builder, path).await?;
        decode(path, &body)
    }

    // =========================================================================
    // ENDPOINTS
    // =========================================================================

    /// Exchange credentials for a token via `POST /login` and store the
    /// resulting token and roles in the session.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the session is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let response: LoginResponse = self.post_json("/login", &LoginRequest { email, password }).await?;
        let roles = parse_roles(&response.roles);
        self.session.login(response.token.clone(), roles);
        Ok(response)
    }

    /// Drop the local session. Tokens are stateless on the backend.
    pub fn logout(&self) {
        self.session.logout();
    }

    /// Single attempt at `GET /services/{id}`.
    ///
    /// # Errors
    ///
    /// Returns the request failure, including 404 for an unknown id.
    pub async fn fetch_service(&self, id: i64) -> Result<Service, ApiError> {
        self.get_json(&format!("/services/{id}")).await
    }

    /// `POST /services`. The backend restricts this to admins.
    ///
    /// # Errors
    ///
    /// Returns the request failure (401/403 when not an admin).
    pub async fn create_service(&self, service: &NewService) -> Result<MessageResponse, ApiError> {
        self.post_json("/services", service).await
    }
}

#[async_trait::async_trait]
impl ApiGet for ApiClient {
    async fn get_value(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        self.get_json(path).await
    }
}

fn transport_error(path: &str, error: &reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout { path: path.to_owned() }
    } else {
        ApiError::Request { path: path.to_owned(), message: error.to_string() }
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode { path: path.to_owned(), message: e.to_string() })
}
