//! Cart route handlers.
//!
//! Every mutation locks the session cart, applies the change, and answers
//! with a `303 See Other` back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use corner_shop_core::{Price, ProductId, Quantity};
use serde::Deserialize;
use tracing::instrument;

use crate::cart::{Cart, CartLineItem};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::SessionCart;
use crate::pricing::{PricingPolicy, Totals};
use crate::routes::products::PLACEHOLDER_IMAGE;
use crate::state::AppState;

/// Where every cart mutation redirects.
const CART_PATH: &str = "/cart";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image_url: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let product = &line.product;
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            quantity: line.quantity.get(),
            price: product.unit_price().display(),
            line_price: Price::from_amount(line.line_total()).rounded().display(),
            image_url: product
                .image
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// Formatted totals for templates.
#[derive(Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<&Totals> for TotalsView {
    fn from(totals: &Totals) -> Self {
        Self {
            subtotal: totals.subtotal_price().display(),
            shipping: totals.shipping_price().display(),
            tax: totals.tax_price().display(),
            total: totals.total_price().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub totals: TotalsView,
    pub item_count: u64,
}

impl CartView {
    /// Build the view of a cart with totals under `policy`.
    #[must_use]
    pub fn new(cart: &Cart, policy: &PricingPolicy) -> Self {
        Self::with_totals(cart, &cart.totals(policy))
    }

    /// Build the view of a cart with totals computed elsewhere.
    #[must_use]
    pub fn with_totals(cart: &Cart, totals: &Totals) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            totals: TotalsView::from(totals),
            item_count: cart.count(),
        }
    }
}

/// Add to cart form data.
///
/// Fields stay raw strings so quantity parsing follows the lenient
/// storefront rules instead of rejecting the form.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: Option<String>,
    pub qty: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: Option<String>,
    pub qty: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub title: String,
    pub cart_count: u64,
    pub cart: CartView,
}

/// Display cart page.
#[instrument(skip(state, cart), fields(cart_id = %cart.id()))]
pub async fn show(State(state): State<AppState>, cart: SessionCart) -> CartShowTemplate {
    let cart = cart.lock().await;
    let view = CartView::new(&cart, state.pricing());

    CartShowTemplate {
        title: "Your Cart".to_string(),
        cart_count: view.item_count,
        cart: view,
    }
}

/// Add a product to the cart, or increase its quantity.
///
/// An unknown or missing product id is a 400.
#[instrument(skip(state, cart), fields(cart_id = %cart.id()))]
pub async fn add(
    State(state): State<AppState>,
    cart: SessionCart,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let id = form
        .id
        .filter(|id| !id.is_empty())
        .map(ProductId::new)
        .ok_or_else(|| AppError::BadRequest("Invalid product".to_string()))?;
    let quantity = Quantity::for_add(form.qty.as_deref());

    cart.lock()
        .await
        .add_from_catalog(state.catalog(), &id, quantity)
        .await?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[
            ("product_id", id.as_str()),
            ("quantity", &quantity.to_string()),
        ]),
    );
    tracing::debug!(product_id = %id, quantity = quantity.get(), "Added to cart");

    Ok(Redirect::to(CART_PATH))
}

/// Set a line's quantity; zero or an unreadable quantity removes the line.
#[instrument(skip(cart), fields(cart_id = %cart.id()))]
pub async fn update(cart: SessionCart, Form(form): Form<UpdateCartForm>) -> Redirect {
    if let Some(id) = form.id {
        let quantity = Quantity::for_update(form.qty.as_deref());
        cart.lock().await.update(&ProductId::new(id), quantity);
    }
    Redirect::to(CART_PATH)
}

/// Remove a line from the cart.
#[instrument(skip(cart), fields(cart_id = %cart.id()))]
pub async fn remove(cart: SessionCart, Form(form): Form<RemoveFromCartForm>) -> Redirect {
    if let Some(id) = form.id {
        cart.lock().await.remove(&ProductId::new(id));
    }
    Redirect::to(CART_PATH)
}
