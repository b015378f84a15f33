//! Session-scoped shopping cart.
//!
//! A [`Cart`] is an ordered list of line items, unique by product id. Each
//! line keeps a snapshot of the product taken when it was first added.
//! Carts live in the [`CartStore`], keyed by the [`CartId`] held in the
//! visitor's session.

mod store;

pub use store::{CartHandle, CartId, CartStore, DEFAULT_MAX_CARTS};

use corner_shop_core::{ProductId, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, Product};
use crate::pricing::{PricingPolicy, Totals};

/// Errors from cart operations that consult the catalog.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("invalid product: {0}")]
    InvalidProduct(ProductId),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// One product-quantity pairing inside a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "qty")]
    pub quantity: Quantity,
}

impl CartLineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .price
            .saturating_mul(Decimal::from(self.quantity.get()))
    }
}

/// An ordered collection of line items with no repeated product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product, or increase the quantity of its existing line.
    pub fn add(&mut self, product: Product, quantity: Quantity) {
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLineItem { product, quantity }),
        }
    }

    /// Look the product up in the catalog and add it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidProduct` if the catalog has no such product,
    /// or `CartError::Catalog` if the catalog cannot be read.
    pub async fn add_from_catalog(
        &mut self,
        catalog: &Catalog,
        id: &ProductId,
        quantity: Quantity,
    ) -> Result<(), CartError> {
        let product = catalog
            .find_product(id)
            .await?
            .ok_or_else(|| CartError::InvalidProduct(id.clone()))?;
        self.add(product, quantity);
        Ok(())
    }

    /// Set a line's quantity; `None` (zero) removes the line.
    ///
    /// Does nothing if the product is not in the cart.
    pub fn update(&mut self, id: &ProductId, quantity: Option<Quantity>) {
        match quantity {
            Some(quantity) => {
                if let Some(line) = self.line_mut(id) {
                    line.quantity = quantity;
                }
            }
            None => self.remove(id),
        }
    }

    /// Remove a product's line if present.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|line| &line.product.id != id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Current totals under the given pricing policy.
    #[must_use]
    pub fn totals(&self, policy: &PricingPolicy) -> Totals {
        policy.compute_totals(&self.items)
    }

    /// Finalize a mock order: compute totals, then empty the cart.
    pub fn checkout(&mut self, policy: &PricingPolicy) -> Totals {
        let totals = self.totals(policy);
        self.clear();
        totals
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|line| &line.product.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;
    use std::io::Write;

    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Decimal::new(cents, 2),
            description: String::new(),
            image: None,
        }
    }

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn assert_invariants(cart: &Cart) {
        let ids: HashSet<&ProductId> = cart.items().iter().map(|l| &l.product.id).collect();
        assert_eq!(ids.len(), cart.items().len(), "duplicate product ids");
        let sum: u64 = cart.items().iter().map(|l| u64::from(l.quantity.get())).sum();
        assert_eq!(cart.count(), sum);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(1));
        cart.add(product("b", 200), qty(2));

        let ids: Vec<&str> = cart.items().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(cart.count(), 3);
        assert_invariants(&cart);
    }

    #[test]
    fn test_add_existing_increments() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(2));
        cart.add(product("a", 100), qty(3));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.get(), 5);
        assert_invariants(&cart);
    }

    #[test]
    fn test_add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(1));
        cart.add(product("a", 999), qty(1));
        assert_eq!(cart.items()[0].product.price, Decimal::new(100, 2));
    }

    #[test]
    fn test_update_sets_quantity() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(2));
        cart.update(&ProductId::new("a"), Some(qty(7)));
        assert_eq!(cart.count(), 7);
    }

    #[test]
    fn test_add_then_update_zero_removes() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(4));
        cart.add(product("b", 100), qty(1));
        cart.update(&ProductId::new("a"), None);

        assert!(cart.items().iter().all(|l| l.product.id.as_str() != "a"));
        assert_eq!(cart.count(), 1);
        assert_invariants(&cart);
    }

    #[test]
    fn test_update_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(1));
        let before = cart.clone();
        cart.update(&ProductId::new("zzz"), Some(qty(3)));
        cart.update(&ProductId::new("zzz"), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(1));
        cart.remove(&ProductId::new("missing"));
        assert_eq!(cart.count(), 1);
        cart.remove(&ProductId::new("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_checkout_returns_totals_and_empties() {
        let policy = PricingPolicy::default();
        let mut cart = Cart::new();
        cart.add(product("a", 1000), qty(2));
        cart.add(product("b", 500), qty(1));

        let totals = cart.checkout(&policy);
        assert_eq!(totals.total, Decimal::new(3249, 2));
        assert!(cart.is_empty());

        let again = cart.checkout(&policy);
        assert_eq!(again, Totals::zero());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serialized_line_uses_qty_field() {
        let mut cart = Cart::new();
        cart.add(product("a", 100), qty(2));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["items"][0]["id"], "a");
        assert_eq!(json["items"][0]["qty"], 2);
    }

    #[tokio::test]
    async fn test_add_from_catalog() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"id": "p1", "name": "Tote", "price": "18.50"}]"#)
            .unwrap();
        let catalog = Catalog::new(file.path());
        let mut cart = Cart::new();

        cart.add_from_catalog(&catalog, &ProductId::new("p1"), qty(2))
            .await
            .unwrap();
        assert_eq!(cart.count(), 2);

        let err = cart
            .add_from_catalog(&catalog, &ProductId::new("ghost"), qty(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidProduct(id) if id.as_str() == "ghost"));
        assert_eq!(cart.count(), 2);
    }
}
