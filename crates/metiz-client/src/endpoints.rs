//! Backend endpoint paths, relative to the API base URL.

use metiz_core::ProductId;

pub const CART: &str = "/api/cart";
pub const ORDERS: &str = "/api/orders";
pub const LOGIN: &str = "/api/auth/login";

/// `/api/cart/{productId}`
pub fn cart_item(product_id: ProductId) -> String {
    format!("{}/{}", CART, product_id)
}
