//! # metiz-core: Pure Storefront Logic for the Metiz Marketplace
//!
//! Everything the storefront decides without talking to anyone: cart math,
//! form validation, registration field mapping and menu visibility.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Metiz Storefront Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/storefront (`metiz` CLI)                   │   │
//! │  │    CartStore ──► OrderFlow      AuthStore ──► RegistrationFlow │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                metiz-client (StorefrontApi)                     │   │
//! │  │        GET/POST/PUT/DELETE /api/cart, /api/orders, ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ metiz-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌────────┐ ┌──────────────┐ ┌───────┐  │   │
//! │  │   │ money  │ │  cart  │ │ order  │ │ registration │ │  nav  │  │   │
//! │  │   └────────┘ └────────┘ └────────┘ └──────────────┘ └───────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Wire types (CartItem, Product, OrderConfirmation)
//! - [`money`] - Money in kopecks (no floating point)
//! - [`cart`] - Cart with a derived total
//! - [`order`] - Contact details and the order body
//! - [`registration`] - Registration form and multipart field mapping
//! - [`auth`] - Roles and sessions
//! - [`navigation`] - Routes and role-based menu
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks run before any request
//!
//! ## Example Usage
//!
//! ```rust
//! use metiz_core::{Cart, CartItem, Money, Product, ProductId};
//!
//! let bread = Product {
//!     name: "Rye bread".to_string(),
//!     description: None,
//!     price: Money::from_rubles(100),
//!     photo: None,
//! };
//! let cart = Cart::from_items(vec![CartItem {
//!     product_id: ProductId::new(1),
//!     quantity: 2,
//!     product: Some(bread),
//! }]);
//!
//! assert_eq!(cart.total_amount().to_string(), "200 ₽");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod error;
pub mod money;
pub mod navigation;
pub mod order;
pub mod registration;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{AuthState, Role, Session};
pub use cart::{Cart, CartState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use navigation::{Menu, MenuEntry, Route};
pub use order::{ContactDetails, OrderLine, OrderRequest};
pub use registration::{
    BuyerProfile, Credentials, PhotoUpload, RegistrationForm, RegistrationPayload,
    RegistrationProfile, VendorProfile,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Catches typos like 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;
