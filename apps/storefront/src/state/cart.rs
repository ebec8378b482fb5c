//! # Cart State
//!
//! The session's cart, kept in step with the backend.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Caller                  CartStore               Backend                │
//! │  ──────                  ─────────               ───────                │
//! │                                                                         │
//! │  refresh() ────────────► loading ──────────────► GET /api/cart         │
//! │                          replace_items() ◄──────                        │
//! │                                                                         │
//! │  add_to_cart(id, n) ───► validate ─────────────► POST /api/cart        │
//! │                          upsert(line) ◄─────────                        │
//! │                                                                         │
//! │  update_quantity(id,n) ► validate (n >= 1) ────► PUT /api/cart/{id}    │
//! │                          upsert(line) ◄─────────                        │
//! │                                                                         │
//! │  remove_from_cart(id) ─► absent? return ───────► DELETE /api/cart/{id} │
//! │                          remove(id) ◄───────────                        │
//! │                                                                         │
//! │  NOTE: local state changes only after the backend confirms.            │
//! │        A failed call sets `error` and leaves the items as they were.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use metiz_client::{ClientError, StorefrontApi};
use metiz_core::validation::{validate_cart_size, validate_quantity};
use metiz_core::{CartState, CoreError, ProductId};

use crate::error::{AppError, AppResult};

/// Observable cart container.
///
/// Cheap to clone; clones share the same state and backend.
#[derive(Clone)]
pub struct CartStore {
    api: Arc<dyn StorefrontApi>,
    state: Arc<watch::Sender<CartState>>,
}

impl CartStore {
    /// Creates an empty cart backed by `api`.
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        let (state, _) = watch::channel(CartState::default());
        CartStore {
            api,
            state: Arc::new(state),
        }
    }

    /// Receiver of every state change. Drop it to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Loads the cart from the backend, replacing local items.
    pub async fn refresh(&self) -> AppResult<()> {
        debug!("refresh cart");
        self.state.send_modify(|s| s.begin_request());

        match self.api.fetch_cart().await {
            Ok(items) => {
                let count = items.len();
                self.state.send_modify(|s| {
                    s.cart.replace_items(items);
                    s.finish_ok();
                });
                info!(lines = count, "Cart loaded");
                Ok(())
            }
            Err(err) => Err(self.fail("refresh", err)),
        }
    }

    /// Adds `quantity` of a product; the backend merges into an existing line.
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: i64) -> AppResult<()> {
        debug!(%product_id, quantity, "add_to_cart");

        validate_quantity(quantity).map_err(CoreError::from)?;
        {
            let current = self.state.borrow();
            match current.cart.get(product_id) {
                Some(line) => validate_quantity(line.quantity.saturating_add(quantity))
                    .map_err(CoreError::from)?,
                None => validate_cart_size(current.cart.item_count()).map_err(|_| {
                    CoreError::CartTooLarge {
                        max: metiz_core::MAX_CART_ITEMS,
                    }
                })?,
            }
        }

        self.state.send_modify(|s| s.begin_request());
        match self.api.add_cart_item(product_id, quantity).await {
            Ok(line) => {
                let stored = line.quantity;
                self.state.send_modify(|s| {
                    s.cart.upsert(line);
                    s.finish_ok();
                });
                info!(%product_id, quantity = stored, "Added to cart");
                Ok(())
            }
            Err(err) => Err(self.fail("add_to_cart", err)),
        }
    }

    /// Sets the quantity of a line already in the cart.
    ///
    /// Quantities below 1 are rejected without touching state or backend.
    pub async fn update_quantity(&self, product_id: ProductId, quantity: i64) -> AppResult<()> {
        debug!(%product_id, quantity, "update_quantity");

        validate_quantity(quantity).map_err(CoreError::from)?;
        if !self.state.borrow().cart.contains(product_id) {
            return Err(CoreError::NotInCart(product_id).into());
        }

        self.state.send_modify(|s| s.begin_request());
        match self.api.update_cart_item(product_id, quantity).await {
            Ok(line) => {
                self.state.send_modify(|s| {
                    s.cart.upsert(line);
                    s.finish_ok();
                });
                info!(%product_id, quantity, "Cart quantity updated");
                Ok(())
            }
            Err(err) => Err(self.fail("update_quantity", err)),
        }
    }

    /// Removes a line. A product that is not in the cart is a no-op.
    pub async fn remove_from_cart(&self, product_id: ProductId) -> AppResult<()> {
        debug!(%product_id, "remove_from_cart");

        if !self.state.borrow().cart.contains(product_id) {
            debug!(%product_id, "Not in cart, nothing to remove");
            return Ok(());
        }

        self.state.send_modify(|s| s.begin_request());
        match self.api.remove_cart_item(product_id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.cart.remove(product_id);
                    s.finish_ok();
                });
                info!(%product_id, "Removed from cart");
                Ok(())
            }
            Err(err) => Err(self.fail("remove_from_cart", err)),
        }
    }

    /// Empties the cart on the backend, then locally.
    pub async fn clear(&self) -> AppResult<()> {
        debug!("clear cart");
        self.state.send_modify(|s| s.begin_request());

        match self.api.clear_cart().await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.cart.clear();
                    s.finish_ok();
                });
                info!("Cart cleared");
                Ok(())
            }
            Err(err) => Err(self.fail("clear", err)),
        }
    }

    /// Local clear after the backend accepted an order.
    pub fn reset_after_checkout(&self) {
        self.state.send_modify(|s| {
            s.cart.clear();
            s.finish_ok();
        });
        debug!("Cart reset after checkout");
    }

    /// Records a failed round trip and converts the error for the caller.
    fn fail(&self, action: &'static str, err: ClientError) -> AppError {
        let app_err = AppError::from(err);
        warn!(action, code = ?app_err.code, message = %app_err.message, "Cart operation failed");
        let message = app_err.message.clone();
        self.state.send_modify(|s| s.finish_err(message));
        app_err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metiz_client::MockStorefrontApi;
    use metiz_core::{CartItem, Money, Product};

    fn line(id: i64, price_rubles: i64, quantity: i64) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            quantity,
            product: Some(Product {
                name: format!("Product {}", id),
                description: None,
                price: Money::from_rubles(price_rubles),
                photo: None,
            }),
        }
    }

    /// Store preloaded with `items` through a mocked `GET /api/cart`.
    async fn loaded_store(items: Vec<CartItem>, mut mock: MockStorefrontApi) -> CartStore {
        mock.expect_fetch_cart()
            .times(1)
            .returning(move || Ok(items.clone()));
        let store = CartStore::new(Arc::new(mock));
        store.refresh().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_refresh_computes_total() {
        let store = loaded_store(
            vec![line(1, 100, 2), line(2, 50, 1)],
            MockStorefrontApi::new(),
        )
        .await;

        let state = store.snapshot();
        assert_eq!(state.total_amount(), Money::from_rubles(250));
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_update_quantity_uses_confirmed_line() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_update_cart_item()
            .withf(|id, qty| *id == ProductId::new(1) && *qty == 4)
            .times(1)
            .returning(|_, _| Ok(line(1, 100, 4)));

        let store = loaded_store(vec![line(1, 100, 2), line(2, 50, 1)], mock).await;
        store.update_quantity(ProductId::new(1), 4).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.cart.get(ProductId::new(1)).unwrap().quantity, 4);
        assert_eq!(state.total_amount(), Money::from_rubles(450));
    }

    #[tokio::test]
    async fn test_update_quantity_rejects_non_positive_without_network() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_update_cart_item().times(0);

        let store = loaded_store(vec![line(1, 100, 2)], mock).await;
        let before = store.snapshot();

        for qty in [0, -1] {
            let err = store.update_quantity(ProductId::new(1), qty).await.unwrap_err();
            assert!(err.is_validation());
            assert_eq!(store.snapshot(), before);
        }
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_remove_cart_item().times(0);

        let store = loaded_store(vec![line(1, 100, 2)], mock).await;
        let before = store.snapshot();

        store.remove_from_cart(ProductId::new(42)).await.unwrap();
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_remove_existing() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_remove_cart_item()
            .withf(|id| *id == ProductId::new(2))
            .times(1)
            .returning(|_| Ok(()));

        let store = loaded_store(vec![line(1, 100, 2), line(2, 50, 1)], mock).await;
        store.remove_from_cart(ProductId::new(2)).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.cart.item_count(), 1);
        assert_eq!(state.total_amount(), Money::from_rubles(200));
    }

    #[tokio::test]
    async fn test_add_merges_into_existing_line() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_add_cart_item()
            .times(1)
            .returning(|_, _| Ok(line(1, 100, 3)));

        let store = loaded_store(vec![line(1, 100, 2)], mock).await;
        store.add_to_cart(ProductId::new(1), 1).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.cart.item_count(), 1);
        assert_eq!(state.total_amount(), Money::from_rubles(300));
    }

    #[tokio::test]
    async fn test_backend_rejection_keeps_items_and_sets_error() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_add_cart_item()
            .times(1)
            .returning(|_, _| Err(ClientError::from_status(400, r#"{"message":"Out of stock"}"#)));

        let store = loaded_store(vec![line(1, 100, 2)], mock).await;
        let err = store.add_to_cart(ProductId::new(9), 1).await.unwrap_err();
        assert_eq!(err.message, "Out of stock");

        let state = store.snapshot();
        assert_eq!(state.cart.item_count(), 1);
        assert_eq!(state.total_amount(), Money::from_rubles(200));
        assert_eq!(state.error.as_deref(), Some("Out of stock"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_update_unknown_product_rejected_locally() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_update_cart_item().times(0);

        let store = loaded_store(vec![line(1, 100, 2)], mock).await;
        assert!(store.update_quantity(ProductId::new(5), 2).await.is_err());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_clear_cart().times(1).returning(|| Ok(()));

        let store = loaded_store(vec![line(1, 100, 2)], mock).await;
        let rx = store.subscribe();

        store.clear().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow().cart.is_empty());
    }

    #[tokio::test]
    async fn test_add_to_huge_existing_line_rejected_locally() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_add_cart_item().times(0);

        let store = loaded_store(vec![line(1, 100, i64::MAX)], mock).await;
        let before = store.snapshot();

        let err = store.add_to_cart(ProductId::new(1), 1).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_total_tracks_confirmed_updates() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_update_cart_item()
            .returning(|id, qty| Ok(line(id.get(), id.get() * 10, qty)));

        let store = loaded_store(vec![line(1, 10, 1), line(2, 20, 1), line(3, 30, 1)], mock).await;

        for id in 1..=3 {
            for qty in [1, 2, 37, 999] {
                store.update_quantity(ProductId::new(id), qty).await.unwrap();
                let state = store.snapshot();
                assert_eq!(state.total_amount(), metiz_core::cart::compute_total(state.items()));
                assert_eq!(state.cart.get(ProductId::new(id)).unwrap().quantity, qty);
            }
        }
        assert_eq!(store.snapshot().total_amount(), Money::from_rubles(59_940));
    }

    #[tokio::test]
    async fn test_oversized_confirmed_line_does_not_panic() {
        let mut mock = MockStorefrontApi::new();
        mock.expect_update_cart_item()
            .times(1)
            .returning(|_, _| Ok(line(1, i64::MAX / 100, 5_000_000_000)));

        let store = loaded_store(vec![line(1, 100, 2), line(2, 50, 1)], mock).await;
        store.update_quantity(ProductId::new(1), 5).await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.total_amount(), metiz_core::cart::compute_total(state.items()));
        assert_eq!(state.total_amount(), Money::from_kopecks(i64::MAX));
    }

    #[tokio::test]
    async fn test_undecodable_refresh_keeps_items() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let mut mock = MockStorefrontApi::new();
        mock.expect_fetch_cart().times(2).returning(move || {
            if calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
                Ok(vec![line(1, 100, 2)])
            } else {
                Err(ClientError::DeserializationFailed("bad quantity".to_string()))
            }
        });

        let store = CartStore::new(Arc::new(mock));
        store.refresh().await.unwrap();
        let err = store.refresh().await.unwrap_err();

        assert_eq!(err.message, "Unexpected response from the server");
        let state = store.snapshot();
        assert_eq!(state.cart.item_count(), 1);
        assert_eq!(state.error.as_deref(), Some("Unexpected response from the server"));
    }

    #[tokio::test]
    async fn test_reset_after_checkout_is_local() {
        let store = loaded_store(vec![line(1, 100, 2)], MockStorefrontApi::new()).await;
        store.reset_after_checkout();
        assert!(store.snapshot().cart.is_empty());
        assert!(store.snapshot().total_amount().is_zero());
    }
}
