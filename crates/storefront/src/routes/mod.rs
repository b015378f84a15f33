//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (home page)
//! GET  /product/{id}           - Product detail (404 if unknown)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (catalog readable)
//!
//! # Cart (form posts redirect back to /cart)
//! GET  /cart                   - Cart page with totals
//! POST /cart/add               - Add or increment a line (400 if unknown product)
//! POST /cart/update            - Set a line quantity (0 removes)
//! POST /cart/remove            - Remove a line
//!
//! # Checkout
//! GET  /checkout               - Order review
//! POST /checkout               - Place mock order and clear the cart
//! ```

pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod products;

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
}

/// Create the health check routes router.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health))
        .route("/ready", get(health::readiness))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::index))
        .route("/product/{id}", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Mock checkout
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        // Health checks
        .nest("/health", health_routes())
}
