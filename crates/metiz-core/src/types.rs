//! # Domain Types
//!
//! Wire and domain types shared by every layer of the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartItem     │   │     Product     │   │ OrderConfirm.   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  productId      │──►│  name           │   │  id             │       │
//! │  │  quantity       │   │  description    │   │  status         │       │
//! │  │  Product?       │   │  price (Money)  │   │  createdAt      │       │
//! │  └─────────────────┘   │  photo (path)   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the backend's JSON, including the capitalised
//! `Product` association it embeds in each cart line.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;
use url::Url;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Backend-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductId(#[ts(type = "number")] i64);

impl ProductId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ProductId)
    }
}

/// Backend-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderId(#[ts(type = "number")] i64);

impl OrderId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        OrderId(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// The product data the backend embeds in a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Unit price. Never negative: negative prices fail to decode.
    #[ts(type = "number")]
    pub price: Money,

    /// Path of the photo on the asset host, e.g. `/uploads/bread.jpg`.
    #[serde(default)]
    pub photo: Option<String>,
}

impl Product {
    /// Resolves the photo path against the asset host.
    ///
    /// Returns `None` when the product has no photo or the path cannot be
    /// joined onto `asset_base`.
    pub fn photo_url(&self, asset_base: &Url) -> Option<Url> {
        let path = self.photo.as_deref()?.trim();
        if path.is_empty() {
            return None;
        }
        asset_base.join(path).ok()
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One product/quantity pairing held in the cart.
///
/// `product` is `None` when the backend no longer knows the product; such a
/// line is still shown (as "product not found") but is priced at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub product_id: ProductId,

    /// Always at least 1; lines with other quantities fail to decode.
    #[serde(deserialize_with = "positive_quantity")]
    #[ts(type = "number")]
    pub quantity: i64,

    #[serde(rename = "Product", default)]
    pub product: Option<Product>,
}

impl CartItem {
    /// Unit price, zero for a missing product.
    pub fn unit_price(&self) -> Money {
        self.product
            .as_ref()
            .map(|p| p.price)
            .unwrap_or_default()
    }

    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Display name, with the storefront's placeholder for missing products.
    pub fn display_name(&self) -> &str {
        self.product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("Product not found")
    }
}

fn positive_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let qty = i64::deserialize(deserializer)?;
    if qty < 1 {
        return Err(de::Error::custom(format!(
            "cart line quantity must be positive, got {}",
            qty
        )));
    }
    Ok(qty)
}

// =============================================================================
// Orders
// =============================================================================

/// What the backend returns after accepting an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderConfirmation {
    pub id: OrderId,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}
