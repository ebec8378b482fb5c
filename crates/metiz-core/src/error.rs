//! # Error Types
//!
//! Domain-specific error types for metiz-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  metiz-core errors (this file)                                         │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Form and input validation failures             │
//! │                                                                         │
//! │  metiz-client errors (separate crate)                                  │
//! │  └── ClientError      - Transport and backend failures                 │
//! │                                                                         │
//! │  storefront errors (app)                                               │
//! │  └── AppError         - What the UI sees (flat message)                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → toast / inline alert   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validation error is raised BEFORE a request leaves the process.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Storefront rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product has no line in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// The `Display` text is what ends up in the inline alert, so it names the
/// field the way the form does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, non-image upload).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
