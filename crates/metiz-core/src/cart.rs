//! # Cart Module
//!
//! The pure cart model: line items keyed by product, and the derived total.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Backend Response          Cart Method             Cart State Change    │
//! │  ────────────────          ───────────             ─────────────────    │
//! │                                                                         │
//! │  GET /api/cart ──────────► replace_items() ──────► items = response    │
//! │                                                                         │
//! │  POST /api/cart ─────────► upsert() ─────────────► merge or push       │
//! │                                                                         │
//! │  PUT /api/cart/{id} ─────► upsert() ─────────────► items[i] = line     │
//! │                                                                         │
//! │  DELETE /api/cart/{id} ──► remove() ─────────────► items.remove(i)     │
//! │                                                                         │
//! │  NOTE: every mutator recomputes `total_amount` before returning.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartItem, ProductId};

/// Sums `price × quantity` over the lines.
pub fn compute_total(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id`, in first-added order
/// - `total_amount == compute_total(items)` after every mutation
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,

    #[ts(type = "number")]
    total_amount: Money,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from a backend listing.
    ///
    /// Duplicate product lines are folded into the first occurrence.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        cart.replace_items(items);
        cart
    }

    /// Replaces every line with `items` (a fresh backend listing).
    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items.clear();
        for item in items {
            match self.position(item.product_id) {
                Some(i) => {
                    let line = &mut self.items[i];
                    line.quantity = line.quantity.saturating_add(item.quantity);
                }
                None => self.items.push(item),
            }
        }
        self.recompute();
    }

    /// Stores a confirmed line: replaces the line for the same product or
    /// appends a new one.
    pub fn upsert(&mut self, item: CartItem) {
        match self.position(item.product_id) {
            Some(i) => self.items[i] = item,
            None => self.items.push(item),
        }
        self.recompute();
    }

    /// Removes the line for `product_id`, returning it if it was present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartItem> {
        let removed = self
            .position(product_id)
            .map(|i| self.items.remove(i));
        if removed.is_some() {
            self.recompute();
        }
        removed
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    /// Returns the line for `product_id`.
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Derived total of all lines.
    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Returns the number of unique lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |acc, i| acc.saturating_add(i.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    fn recompute(&mut self) {
        self.total_amount = compute_total(&self.items);
    }
}

// =============================================================================
// Cart State
// =============================================================================

/// The cart plus the status of the most recent backend round trip.
///
/// `error` is a user-displayable string, never a structured code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    pub cart: Cart,
    pub loading: bool,
    pub error: Option<String>,
}

impl CartState {
    /// Marks a request as in flight and clears the previous error.
    pub fn begin_request(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Records a successful round trip.
    pub fn finish_ok(&mut self) {
        self.loading = false;
        self.error = None;
    }

    /// Records a failed round trip. The cart itself is left as it was.
    pub fn finish_err(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn total_amount(&self) -> Money {
        self.cart.total_amount()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

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

    #[test]
    fn test_total_of_two_lines() {
        let cart = Cart::from_items(vec![line(1, 100, 2), line(2, 50, 1)]);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_amount(), Money::from_rubles(250));
    }

    #[test]
    fn test_upsert_replaces_existing_line() {
        let mut cart = Cart::from_items(vec![line(1, 100, 2)]);

        cart.upsert(line(1, 100, 5));

        assert_eq!(cart.item_count(), 1); // Still one unique line
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.total_amount(), Money::from_rubles(500));
    }

    #[test]
    fn test_upsert_appends_in_order() {
        let mut cart = Cart::from_items(vec![line(2, 50, 1)]);
        cart.upsert(line(1, 100, 1));

        let ids: Vec<i64> = cart.items().iter().map(|i| i.product_id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_from_items_folds_duplicates() {
        let cart = Cart::from_items(vec![line(1, 10, 1), line(2, 20, 1), line(1, 10, 2)]);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, 3);
        assert_eq!(cart.total_amount(), Money::from_rubles(50));
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::from_items(vec![line(1, 100, 2), line(2, 50, 1)]);

        let removed = cart.remove(ProductId::new(1));
        assert_eq!(removed.map(|i| i.quantity), Some(2));
        assert_eq!(cart.total_amount(), Money::from_rubles(50));

        let before = cart.clone();
        assert!(cart.remove(ProductId::new(99)).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_missing_product_counts_zero() {
        let mut cart = Cart::from_items(vec![line(1, 100, 1)]);
        cart.upsert(CartItem {
            product_id: ProductId::new(2),
            quantity: 3,
            product: None,
        });

        assert_eq!(cart.total_amount(), Money::from_rubles(100));
    }

    #[test]
    fn test_total_matches_recomputation_after_each_mutation() {
        let mut cart = Cart::new();
        let steps: Vec<Box<dyn Fn(&mut Cart)>> = vec![
            Box::new(|c| c.upsert(line(1, 30, 2))),
            Box::new(|c| c.upsert(line(2, 7, 9))),
            Box::new(|c| c.upsert(line(1, 30, 1))),
            Box::new(|c| {
                c.remove(ProductId::new(2));
            }),
            Box::new(|c| c.replace_items(vec![line(3, 11, 4)])),
            Box::new(|c| c.clear()),
        ];

        for step in steps {
            step(&mut cart);
            assert_eq!(cart.total_amount(), compute_total(cart.items()));
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn test_huge_backend_lines_saturate() {
        let cart = Cart::from_items(vec![line(1, 1, i64::MAX), line(1, 1, 5), line(2, 1, 1)]);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().quantity, i64::MAX);
        assert_eq!(cart.total_quantity(), i64::MAX);
        assert_eq!(cart.total_amount(), Money::from_kopecks(i64::MAX));
        assert_eq!(cart.total_amount(), compute_total(cart.items()));
    }

    #[test]
    fn test_cart_state_round_trip_flags() {
        let mut state = CartState::default();

        state.begin_request();
        assert!(state.loading);

        state.finish_err("Network error");
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Network error"));

        state.begin_request();
        assert!(state.error.is_none());
        state.finish_ok();
        assert!(!state.loading);
    }
}
