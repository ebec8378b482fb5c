//! # Client Error Types
//!
//! Error types for backend calls.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Rejected (4xx/5xx)     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Unauthorized (401)     │ │
//! │  │                 │  │                 │  │  DeserializationFailed  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Core (wraps CoreError): rejected before any request was made   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status codes and response bodies stay in the error for logging.
//! [`ClientError::user_message`] is the flat text the UI shows.

use metiz_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for backend calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// A configured or derived URL does not parse.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The backend could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The configured request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// Building or sending the request failed for another reason.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// The backend answered with a non-2xx status.
    #[error("Backend rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered 401.
    #[error("Not authorized")]
    Unauthorized,

    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    DeserializationFailed(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Input rejected locally; nothing was sent.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            ClientError::DeserializationFailed(err.to_string())
        } else if err.is_builder() {
            ClientError::InvalidConfig(err.to_string())
        } else {
            ClientError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DeserializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Builds the error for a non-2xx response.
    ///
    /// The backend reports failures as `{"message": "..."}` or
    /// `{"error": "..."}`; anything else keeps the raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return ClientError::Unauthorized;
        }

        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string());

        ClientError::Rejected { status, message }
    }

    /// Returns true if nothing was sent because local checks failed.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ClientError::Core(_))
    }

    /// Returns true if the backend could not be reached at all.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ClientError::ConnectionFailed(_) | ClientError::Timeout | ClientError::RequestFailed(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_) | ClientError::InvalidUrl(_)
        )
    }

    /// The flat message shown to the user.
    ///
    /// Backend messages are passed through when present; transport details
    /// are not.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Core(err) => err.to_string(),
            ClientError::Rejected { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Rejected { status, .. } => {
                format!("Request failed with status {}", status)
            }
            ClientError::Unauthorized => "Please log in again".to_string(),
            ClientError::Timeout => "The server took too long to respond".to_string(),
            ClientError::ConnectionFailed(_) | ClientError::RequestFailed(_) => {
                "Could not reach the server".to_string()
            }
            ClientError::DeserializationFailed(_) => {
                "Unexpected response from the server".to_string()
            }
            ClientError::InvalidConfig(_) | ClientError::InvalidUrl(_) => {
                "The storefront is misconfigured".to_string()
            }
        }
    }
}
