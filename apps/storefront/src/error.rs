//! # App Error Type
//!
//! Unified error type for containers, flows and the CLI.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Container / Flow             Conversion              UI                │
//! │  ────────────────             ──────────              ──                │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──┐                                      │
//! │                                  ├──► AppError { code, message }        │
//! │  reqwest / status ─► ClientError ┘          │                           │
//! │                                             ▼                           │
//! │                               inline alert / error toast               │
//! │                               (message only; details are logged)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use metiz_client::ClientError;
use metiz_core::CoreError;

use crate::config::ConfigError;

/// Error returned from storefront operations.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Passwords do not match"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for storefront failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any request
    ValidationError,

    /// Cart rule violated (empty cart, too many lines)
    CartError,

    /// Backend answered with an error status
    BackendError,

    /// Backend could not be reached
    NetworkError,

    /// Session missing or expired
    Unauthorized,

    /// Configuration could not be loaded or is invalid
    ConfigError,
}

/// Result type alias for storefront operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Creates a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn is_validation(&self) -> bool {
        self.code == ErrorCode::ValidationError
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => AppError::validation(e.to_string()),
            CoreError::NotInCart(_) => AppError::new(ErrorCode::CartError, err.to_string()),
            CoreError::EmptyCart => AppError::new(ErrorCode::CartError, err.to_string()),
            CoreError::CartTooLarge { .. } => {
                AppError::new(ErrorCode::CartError, err.to_string())
            }
        }
    }
}

/// Converts client errors to app errors.
///
/// The detailed error is logged; the message is the flat user text.
impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let message = err.user_message();
        match err {
            ClientError::Core(core) => AppError::from(core),
            ClientError::Rejected { status, .. } => {
                tracing::warn!(status, error = %err, "Backend rejected request");
                AppError::new(ErrorCode::BackendError, message)
            }
            ClientError::Unauthorized => AppError::new(ErrorCode::Unauthorized, message),
            ClientError::ConnectionFailed(_)
            | ClientError::Timeout
            | ClientError::RequestFailed(_) => {
                tracing::error!(error = %err, "Backend unreachable");
                AppError::new(ErrorCode::NetworkError, message)
            }
            ClientError::DeserializationFailed(_) => {
                tracing::error!(error = %err, "Unexpected backend payload");
                AppError::new(ErrorCode::BackendError, message)
            }
            ClientError::InvalidConfig(_) | ClientError::InvalidUrl(_) => {
                tracing::error!(error = %err, "Client misconfigured");
                AppError::new(ErrorCode::ConfigError, err.to_string())
            }
        }
    }
}

/// Converts configuration errors to app errors.
impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;
    use metiz_core::ValidationError;

    #[test]
    fn test_validation_maps_to_flat_message() {
        let err = AppError::from(CoreError::from(ValidationError::PasswordMismatch));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Passwords do not match");
    }

    #[test]
    fn test_backend_rejection() {
        let err = AppError::from(ClientError::from_status(500, ""));
        assert_eq!(err.code, ErrorCode::BackendError);
        assert_eq!(err.message, "Request failed with status 500");
    }

    #[test]
    fn test_network_error_hides_details() {
        let err = AppError::from(ClientError::ConnectionFailed("dns error: metiz.local".into()));
        assert_eq!(err.code, ErrorCode::NetworkError);
        assert!(!err.message.contains("metiz.local"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(AppError::validation("quantity must be positive")).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "quantity must be positive");
    }
}
