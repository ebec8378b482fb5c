//! # Validation Module
//!
//! Client-side validation for cart operations and storefront forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client side)                                    │
//! │  ├── quantity >= 1, password == confirmation, required fields          │
//! │  └── Fails BEFORE any request is built                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend                                                      │
//! │  ├── Uniqueness (email already registered)                             │
//! │  └── Stock, prices, ownership                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use metiz_core::validation::{validate_password_confirmation, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_password_confirmation("secret", "secret").is_ok());
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text field the forms accept.
const MAX_TEXT_LEN: usize = 255;

/// Longest description the forms accept.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a required text field is present and not overly long.
///
/// Returns the trimmed value.
pub fn validate_required<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value)
}

/// Validates an optional free-text field against a length limit.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Required
/// - Exactly one `@` with text on both sides
/// - A dot somewhere in the domain part, not at its edges
///
/// The backend decides deliverability; this only catches typos.
///
/// ```rust
/// use metiz_core::validation::validate_email;
///
/// assert!(validate_email("baker@example.ru").is_ok());
/// assert!(validate_email("baker@").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    let email = validate_required("email", email)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("must contain @"))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    Ok(email)
}

/// Validates a phone number.
///
/// ## Rules
/// - Required
/// - Digits plus the usual separators (`+ - ( ) space`)
/// - 10 to 15 digits
pub fn validate_phone<'a>(field: &str, phone: &'a str) -> ValidationResult<&'a str> {
    let phone = validate_required(field, phone)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only digits, spaces, +, -, ( and )".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain 10 to 15 digits".to_string(),
        });
    }

    Ok(phone)
}

/// Validates that a password was entered and typed the same way twice.
///
/// The mismatch check comes first so the user sees the message the
/// registration form is known for.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult<()> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }

    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok(())
}

/// Validates the content type of an uploaded photo (`image/*`).
pub fn validate_image_type(content_type: &str) -> ValidationResult<()> {
    let is_image = content_type
        .split_once('/')
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("image") && !subtype.is_empty());

    if !is_image {
        return Err(ValidationError::InvalidFormat {
            field: "photo".to_string(),
            reason: format!("expected an image, got {content_type}"),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: quantity field changed                                           │
/// │                                                                         │
/// │  User types: 0                                                          │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → rejected, cart untouched, no request             │
/// │       ├── qty > 999? → rejected                                        │
/// │       └── OK → PUT /api/cart/{productId}                               │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
pub fn validate_cart_size(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("name", "  Anna ").unwrap(), "Anna");
        assert_eq!(
            validate_required("name", "   "),
            Err(ValidationError::required("name"))
        );
        assert!(validate_required("name", &"a".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("baker@example.ru").is_ok());
        assert!(validate_email(" baker@example.ru ").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("baker").is_err());
        assert!(validate_email("@example.ru").is_err());
        assert!(validate_email("baker@example").is_err());
        assert!(validate_email("baker@.ru").is_err());
        assert!(validate_email("a@b@example.ru").is_err());
        assert!(validate_email("ba ker@example.ru").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("phone", "+7 (912) 345-67-89").is_ok());
        assert!(validate_phone("phone", "89123456789").is_ok());

        assert!(validate_phone("phone", "").is_err());
        assert!(validate_phone("phone", "12345").is_err());
        assert!(validate_phone("phone", "call me maybe").is_err());
    }

    #[test]
    fn test_validate_password_confirmation() {
        assert!(validate_password_confirmation("secret", "secret").is_ok());
        assert_eq!(
            validate_password_confirmation("secret", "Secret"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_password_confirmation("", ""),
            Err(ValidationError::required("password"))
        );
    }

    #[test]
    fn test_validate_image_type() {
        assert!(validate_image_type("image/jpeg").is_ok());
        assert!(validate_image_type("IMAGE/png").is_ok());

        assert!(validate_image_type("application/pdf").is_err());
        assert!(validate_image_type("image/").is_err());
        assert!(validate_image_type("image").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(0).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS - 1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_err());
    }
}
