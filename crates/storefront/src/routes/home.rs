//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::SessionCart;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub cart_count: u64,
    /// Every product in catalog order.
    pub products: Vec<ProductView>,
}

/// Display the home page with the full catalog.
#[instrument(skip(state, cart))]
pub async fn index(State(state): State<AppState>, cart: SessionCart) -> Result<HomeTemplate> {
    let products = state
        .catalog()
        .list_products()
        .await?
        .iter()
        .map(ProductView::from)
        .collect();

    let cart_count = cart.lock().await.count();

    Ok(HomeTemplate {
        title: "Home".to_string(),
        cart_count,
        products,
    })
}
