//! # Order Module
//!
//! Contact details entered at checkout and the order body built from a cart
//! snapshot.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductId;
use crate::validation::{
    validate_email, validate_max_len, validate_phone, validate_required, MAX_DESCRIPTION_LEN,
};

// =============================================================================
// Contact Details
// =============================================================================

/// Who receives the order and where it goes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ContactDetails {
    pub full_name: String,
    pub phone: String,
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ContactDetails {
    /// Checks required fields, and the optional ones when present.
    pub fn validate(&self) -> CoreResult<()> {
        validate_required("fullName", &self.full_name)?;
        validate_phone("phone", &self.phone)?;
        validate_required("address", &self.address)?;

        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            validate_email(email)?;
        }
        if let Some(comment) = &self.comment {
            validate_max_len("comment", comment, MAX_DESCRIPTION_LEN)?;
        }

        Ok(())
    }

    /// Trimmed copy with blank optional fields dropped.
    fn normalized(&self) -> Self {
        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        ContactDetails {
            full_name: self.full_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            email: optional(&self.email),
            comment: optional(&self.comment),
        }
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: ProductId,

    #[ts(type = "number")]
    pub quantity: i64,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderRequest {
    #[serde(flatten)]
    pub contact: ContactDetails,

    pub items: Vec<OrderLine>,

    /// Total the buyer saw when submitting. The backend prices the order
    /// itself; this is informational.
    #[ts(type = "number")]
    pub total_amount: Money,
}

impl OrderRequest {
    /// Builds the request from a cart snapshot.
    ///
    /// ## Errors
    /// - `CoreError::EmptyCart` when there is nothing to order
    /// - `CoreError::Validation` when the contact details are incomplete
    pub fn from_cart(cart: &Cart, contact: &ContactDetails) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        contact.validate()?;

        let items = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect();

        Ok(OrderRequest {
            contact: contact.normalized(),
            items,
            total_amount: cart.total_amount(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{CartItem, Product};

    fn contact() -> ContactDetails {
        ContactDetails {
            full_name: " Anna Petrova ".to_string(),
            phone: "+7 912 345 67 89".to_string(),
            address: "Kazan, Baumana 5".to_string(),
            email: Some("  ".to_string()),
            comment: Some("Ring twice".to_string()),
        }
    }

    fn cart() -> Cart {
        Cart::from_items(vec![CartItem {
            product_id: ProductId::new(4),
            quantity: 3,
            product: Some(Product {
                name: "Baguette".to_string(),
                description: None,
                price: Money::from_rubles(60),
                photo: None,
            }),
        }])
    }

    #[test]
    fn test_order_request_from_cart() {
        let request = OrderRequest::from_cart(&cart(), &contact()).unwrap();

        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].quantity, 3);
        assert_eq!(request.total_amount, Money::from_rubles(180));
        assert_eq!(request.contact.full_name, "Anna Petrova");
        assert_eq!(request.contact.email, None);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fullName"], "Anna Petrova");
        assert_eq!(json["items"][0]["productId"], 4);
        assert_eq!(json["totalAmount"], 180.0);
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = OrderRequest::from_cart(&Cart::new(), &contact());
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_missing_contact_fields_rejected() {
        let mut details = contact();
        details.address = String::new();

        let result = OrderRequest::from_cart(&cart(), &details);
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_bad_optional_email_rejected() {
        let mut details = contact();
        details.email = Some("not-an-email".to_string());
        assert!(details.validate().is_err());
    }
}
