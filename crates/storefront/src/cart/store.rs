//! In-memory cart storage keyed by session cart id.
//!
//! Entries expire a fixed time after creation (`time_to_live`), matching the
//! session lifetime. Mutating a cart through its handle does not extend the
//! window. Each cart sits behind an async mutex so requests from the same
//! session apply their changes one at a time.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::Cart;

/// Default upper bound on concurrently held carts.
pub const DEFAULT_MAX_CARTS: u64 = 10_000;

/// Random identifier stored in the session that keys a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(Uuid);

impl CartId {
    /// Generate a new random cart id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for CartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Shared, lockable reference to one cart.
pub type CartHandle = Arc<Mutex<Cart>>;

/// Expiring key-value store of carts.
#[derive(Clone)]
pub struct CartStore {
    carts: Cache<CartId, CartHandle>,
}

impl CartStore {
    /// Create a store whose carts live for `ttl` after creation.
    #[must_use]
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let carts = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { carts }
    }

    /// The cart for `id`, created empty on first access or after expiry.
    pub async fn cart(&self, id: CartId) -> CartHandle {
        self.carts
            .get_with(id, async move {
                tracing::debug!(cart_id = %id, "Creating cart");
                Arc::new(Mutex::new(Cart::new()))
            })
            .await
    }

    /// Approximate number of live carts.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.carts.entry_count()
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("entries", &self.carts.entry_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_shop_core::{ProductId, Quantity};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::Product;

    fn tote() -> Product {
        Product {
            id: ProductId::new("tote"),
            name: "Tote".to_string(),
            price: Decimal::new(1850, 2),
            description: String::new(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_same_id_returns_same_cart() {
        let store = CartStore::new(Duration::from_secs(60), 100);
        let id = CartId::generate();

        store.cart(id).await.lock().await.add(tote(), Quantity::ONE);
        assert_eq!(store.cart(id).await.lock().await.count(), 1);
    }

    #[tokio::test]
    async fn test_carts_are_isolated() {
        let store = CartStore::new(Duration::from_secs(60), 100);
        let first = CartId::generate();
        let second = CartId::generate();

        store.cart(first).await.lock().await.add(tote(), Quantity::ONE);
        assert!(store.cart(second).await.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_cart_expires_after_ttl() {
        let store = CartStore::new(Duration::from_millis(50), 100);
        let id = CartId::generate();
        store.cart(id).await.lock().await.add(tote(), Quantity::ONE);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.cart(id).await.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let store = CartStore::new(Duration::from_secs(60), 100);
        let id = CartId::generate();

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    let cart = store.cart(id).await;
                    let mut cart = cart.lock().await;
                    tokio::task::yield_now().await;
                    cart.add(tote(), Quantity::ONE);
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let cart = store.cart(id).await;
        let cart = cart.lock().await;
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.count(), 32);
    }

    #[test]
    fn test_cart_id_serializes_as_uuid_string() {
        let id = CartId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
