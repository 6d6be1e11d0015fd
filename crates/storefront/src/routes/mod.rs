//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                           - Health check
//!
//! # Catalog
//! GET    /api/products                     - Product listing (?category=<slug>)
//! GET    /api/products/{id}                - Product detail
//! GET    /api/categories                   - Category listing
//!
//! # Shopper
//! GET    /api/me                           - Calling user
//!
//! # Cart
//! GET    /api/cart                         - Cart with products
//! GET    /api/cart/count                   - Units in cart
//! POST   /api/cart                         - Add to cart
//! DELETE /api/cart                         - Clear cart
//! PATCH  /api/cart/{id}                    - Update quantity (<= 0 removes)
//! DELETE /api/cart/{id}                    - Remove item
//!
//! # Favorites
//! GET    /api/favorites                    - Favorites with products
//! GET    /api/favorites/count              - Number of favorites
//! POST   /api/favorites                    - Add favorite
//! POST   /api/favorites/{product_id}/toggle - Toggle favorite
//! DELETE /api/favorites/{product_id}       - Remove favorite
//!
//! # Orders
//! POST   /api/orders                       - Place order
//! GET    /api/orders/{id}                  - Order detail
//! ```

pub mod account;
pub mod cart;
pub mod favorites;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::index).post(cart::add).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/{id}", patch(cart::update).delete(cart::remove))
}

/// Create the favorites routes router.
pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index).post(favorites::add))
        .route("/count", get(favorites::count))
        .route("/{product_id}", axum::routing::delete(favorites::remove))
        .route("/{product_id}/toggle", post(favorites::toggle))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .route("/api/categories", get(products::categories))
        .route("/api/me", get(account::me))
        .nest("/api/cart", cart_routes())
        .nest("/api/favorites", favorite_routes())
        .nest("/api/orders", order_routes())
}
