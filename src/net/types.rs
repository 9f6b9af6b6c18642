//! Wire types for the marketplace REST API, plus the request error type.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Failure of a single outbound request. Surfaced to callers unmodified.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request did not complete within the configured timeout.
    #[error("request to {path} timed out")]
    Timeout { path: String },

    /// Connection or transport failure.
    #[error("request to {path} failed: {message}")]
    Request { path: String, message: String },

    /// The backend answered with a non-success status.
    #[error("{path} returned status {status}")]
    Status { path: String, status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("{path} returned an unexpected body: {message}")]
    Decode { path: String, message: String },
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `message` field of a JSON error body, when the backend sent one.
    #[must_use]
    pub fn backend_message(&self) -> Option<String> {
        let Self::Status { body, .. } = self else {
            return None;
        };
        serde_json::from_str::<MessageResponse>(body).ok().map(|m| m.message)
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// SERVICES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub base_price: f64,
    /// Expected duration, in minutes.
    pub time_required: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewService {
    pub name: String,
    pub base_price: f64,
    pub time_required: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// SERVICE REQUESTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRequestStatus {
    Requested,
    Accepted,
    Completed,
    Rejected,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: i64,
    pub service_id: i64,
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub professional_id: Option<i64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_request: Option<String>,
    #[serde(default)]
    pub date_of_completion: Option<String>,
    pub status: ServiceRequestStatus,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub customer_contact_number: Option<String>,
}
