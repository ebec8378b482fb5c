//! The backend seam.
//!
//! State containers and flows hold an `Arc<dyn StorefrontApi>`. Production
//! wires in [`HttpStorefrontApi`](crate::HttpStorefrontApi); tests use the
//! generated `MockStorefrontApi`.

use async_trait::async_trait;
use mockall::automock;

use metiz_core::{CartItem, OrderConfirmation, OrderRequest, ProductId, RegistrationPayload, Session};

use crate::error::ClientResult;

/// Operations the storefront performs against the marketplace backend.
///
/// Every call is one request; failures are returned, never retried.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /api/cart`
    async fn fetch_cart(&self) -> ClientResult<Vec<CartItem>>;

    /// `POST /api/cart`, returns the stored line.
    async fn add_cart_item(&self, product_id: ProductId, quantity: i64) -> ClientResult<CartItem>;

    /// `PUT /api/cart/{productId}`, returns the stored line.
    async fn update_cart_item(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> ClientResult<CartItem>;

    /// `DELETE /api/cart/{productId}`
    async fn remove_cart_item(&self, product_id: ProductId) -> ClientResult<()>;

    /// `DELETE /api/cart`
    async fn clear_cart(&self) -> ClientResult<()>;

    /// `POST /api/orders`
    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderConfirmation>;

    /// `POST /api/auth/login`
    async fn login(&self, email: &str, password: &str) -> ClientResult<Session>;

    /// Multipart `POST` to the registration endpoint of the payload's role.
    async fn register(&self, payload: RegistrationPayload) -> ClientResult<()>;
}
