//! # Order Submission
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Checkout                                         │
//! │                                                                         │
//! │  cart snapshot + contact details                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  OrderRequest::from_cart ── empty cart / missing field ──► inline error │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  POST /api/orders ───────── failure ─────────────────────► inline error │
//! │        │                                                  (cart kept)  │
//! │        ▼                                                                │
//! │  cart.reset_after_checkout()                                           │
//! │  navigate to /orders                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use metiz_client::StorefrontApi;
use metiz_core::{ContactDetails, OrderConfirmation, OrderRequest, Route};

use crate::error::{AppError, AppResult};
use crate::notice::Redirect;
use crate::state::CartStore;

/// A placed order and where to go next.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlaced {
    pub confirmation: OrderConfirmation,
    pub redirect: Redirect,
}

/// Submits the cart as an order.
#[derive(Clone)]
pub struct OrderFlow {
    api: Arc<dyn StorefrontApi>,
    cart: CartStore,
}

impl OrderFlow {
    pub fn new(api: Arc<dyn StorefrontApi>, cart: CartStore) -> Self {
        OrderFlow { api, cart }
    }

    /// Places the order for the current cart.
    ///
    /// Each call is one submission; nothing guards against a repeated click.
    pub async fn submit(&self, contact: &ContactDetails) -> AppResult<OrderPlaced> {
        let snapshot = self.cart.snapshot();
        let request = OrderRequest::from_cart(&snapshot.cart, contact)?;
        debug!(
            lines = request.items.len(),
            total = %request.total_amount,
            "submit order"
        );

        let confirmation = self.api.submit_order(&request).await.map_err(|err| {
            let app_err = AppError::from(err);
            warn!(code = ?app_err.code, message = %app_err.message, "Order submission failed");
            app_err
        })?;

        self.cart.reset_after_checkout();
        info!(order_id = %confirmation.id, "Order placed");

        Ok(OrderPlaced {
            confirmation,
            redirect: Redirect::now(Route::Orders),
        })
    }
}
