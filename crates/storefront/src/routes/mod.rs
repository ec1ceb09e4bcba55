//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                - Shop page (store panel + product grid)
//! GET  /health          - Health check
//!
//! # Catalog
//! POST /stores/select   - Switch store (returns shop content fragment)
//!
//! # Cart (HTMX fragments)
//! GET  /cart            - Cart page (form, line items, total)
//! POST /cart/add        - Add to cart (returns cart count, triggers cart-updated)
//! POST /cart/update     - Update quantity (returns cart_items fragment)
//! POST /cart/remove     - Remove item (returns cart_items fragment)
//! GET  /cart/count      - Cart count badge (fragment)
//!
//! # Orders
//! POST /orders          - Submit the order (returns order_notice fragment)
//! ```

pub mod cart;
pub mod orders;
pub mod shop;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Shop page
        .route("/", get(shop::index))
        // Store selection
        .route("/stores/select", post(shop::select_store))
        // Cart routes
        .nest("/cart", cart_routes())
        // Order submission
        .route("/orders", post(orders::submit))
}
