//! Mock checkout route handlers.
//!
//! There is no payment step. Placing an order computes the final totals,
//! empties the cart, and renders a confirmation.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::cart::Cart;
use crate::error::add_breadcrumb;
use crate::filters;
use crate::middleware::SessionCart;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Checkout page template, used both before and after the order is placed.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub title: String,
    pub cart_count: u64,
    pub cart: CartView,
    /// True once the order has been placed and the cart emptied.
    pub placed: bool,
}

/// Display the cart and totals ahead of purchase.
#[instrument(skip(state, cart), fields(cart_id = %cart.id()))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> CheckoutTemplate {
    let cart = cart.lock().await;
    let view = CartView::new(&cart, state.pricing());

    CheckoutTemplate {
        title: "Checkout".to_string(),
        cart_count: view.item_count,
        cart: view,
        placed: false,
    }
}

/// Finalize the mock order.
///
/// The confirmation shows the totals that were charged next to the now
/// empty cart.
#[instrument(skip(state, cart), fields(cart_id = %cart.id()))]
pub async fn place_order(State(state): State<AppState>, cart: SessionCart) -> CheckoutTemplate {
    let mut guard = cart.lock().await;
    let items = guard.count();
    let totals = guard.checkout(state.pricing());
    drop(guard);

    tracing::info!(
        cart_id = %cart.id(),
        items,
        total = %totals.total,
        "Order placed"
    );
    add_breadcrumb("checkout", "Order placed", None);

    CheckoutTemplate {
        title: "Order Placed".to_string(),
        cart_count: 0,
        cart: CartView::with_totals(&Cart::new(), &totals),
        placed: true,
    }
}
