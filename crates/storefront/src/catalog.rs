//! Product catalog backed by a static JSON file.
//!
//! The file is re-read on every call so edits show up without a restart.
//! Absence of a product is a normal outcome (`Ok(None)`); only unreadable or
//! malformed data is an error.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use corner_shop_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

/// Errors raised while loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("product id {0} appears more than once")]
    DuplicateId(ProductId),
}

/// A purchasable product as stored in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price; accepts JSON numbers or strings.
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    /// Image reference (URL or path under `/static`).
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Unit price in the store currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }
}

/// Read-only product lookup over a JSON file.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All products, in file order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or its contents are
    /// malformed.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Read {
                path: self.path.clone(),
                source,
            })?;
        parse_products(&raw)
    }

    /// The product with the given id, or `None` if the catalog has no match.
    ///
    /// # Errors
    ///
    /// Same as [`Catalog::list_products`].
    pub async fn find_product(&self, id: &ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self
            .list_products()
            .await?
            .into_iter()
            .find(|product| &product.id == id))
    }
}

/// Parse and validate catalog JSON (an array of products).
///
/// # Errors
///
/// Returns `CatalogError` on invalid JSON, a negative price, or a repeated id.
pub fn parse_products(raw: &str) -> Result<Vec<Product>, CatalogError> {
    let products: Vec<Product> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(products.len());
    for product in &products {
        if product.price.is_sign_negative() && !product.price.is_zero() {
            return Err(CatalogError::NegativePrice(product.id.clone()));
        }
        if !seen.insert(&product.id) {
            return Err(CatalogError::DuplicateId(product.id.clone()));
        }
    }

    Ok(products)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"[
        {"id": "p1", "name": "Canvas Tote", "price": 18.5, "description": "Roomy.", "image": "/static/images/tote.svg"},
        {"id": "p2", "name": "Enamel Mug", "price": "12.00"}
    ]"#;

    fn catalog_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_keeps_source_order() {
        let products = parse_products(SAMPLE).unwrap();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2"]);
        assert_eq!(products[0].price, Decimal::new(1850, 2));
        assert_eq!(products[1].price, Decimal::new(1200, 2));
        assert_eq!(products[1].description, "");
        assert!(products[1].image.is_none());
    }

    #[test]
    fn test_parse_rejects_negative_price() {
        let err = parse_products(r#"[{"id": "x", "name": "X", "price": -1}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::NegativePrice(id) if id.as_str() == "x"));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let raw = r#"[{"id": "x", "name": "X", "price": 1}, {"id": "x", "name": "Y", "price": 2}]"#;
        assert!(matches!(
            parse_products(raw).unwrap_err(),
            CatalogError::DuplicateId(_)
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_products("{not json").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn test_find_product() {
        let file = catalog_file(SAMPLE);
        let catalog = Catalog::new(file.path());

        let found = catalog.find_product(&ProductId::new("p2")).await.unwrap();
        assert_eq!(found.unwrap().name, "Enamel Mug");

        let missing = catalog.find_product(&ProductId::new("nope")).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let catalog = Catalog::new("/definitely/not/here/products.json");
        assert!(matches!(
            catalog.list_products().await.unwrap_err(),
            CatalogError::Read { .. }
        ));
    }

    #[tokio::test]
    async fn test_reads_fresh_on_every_call() {
        let mut file = catalog_file(r#"[{"id": "a", "name": "A", "price": 1}]"#);
        let catalog = Catalog::new(file.path());
        assert_eq!(catalog.list_products().await.unwrap().len(), 1);

        file.as_file_mut().set_len(0).unwrap();
        std::fs::write(
            file.path(),
            r#"[{"id": "a", "name": "A", "price": 1}, {"id": "b", "name": "B", "price": 2}]"#,
        )
        .unwrap();
        assert_eq!(catalog.list_products().await.unwrap().len(), 2);
    }
}
