//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use corner_shop_core::ProductId;
use tracing::instrument;

use crate::catalog::Product;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::SessionCart;
use crate::state::AppState;

/// Image shown when a product has no image reference.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.unit_price().display(),
            description: product.description.clone(),
            image_url: product
                .image
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub title: String,
    pub cart_count: u64,
    pub product: ProductView,
}

/// Display product detail page.
#[instrument(skip(state, cart))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    cart: SessionCart,
) -> Result<ProductShowTemplate> {
    let product = state
        .catalog()
        .find_product(&ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let cart_count = cart.lock().await.count();

    Ok(ProductShowTemplate {
        title: product.name.clone(),
        cart_count,
        product: ProductView::from(&product),
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_view_formats_price_and_placeholder() {
        let product = Product {
            id: ProductId::new("mug"),
            name: "Enamel Mug".to_string(),
            price: Decimal::new(12, 0),
            description: "Sturdy.".to_string(),
            image: None,
        };
        let view = ProductView::from(&product);
        assert_eq!(view.price, "$12.00");
        assert_eq!(view.image_url, PLACEHOLDER_IMAGE);
    }
}
