//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::{CartStore, DEFAULT_MAX_CARTS};
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::pricing::PricingPolicy;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart store, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Carts expire after the configured session lifetime.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = Catalog::new(config.catalog_path.clone());
        let carts = CartStore::new(config.session_ttl, DEFAULT_MAX_CARTS);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the session cart store.
    #[must_use]
    pub fn carts(&self) -> &CartStore {
        &self.inner.carts
    }

    /// Get the shipping and tax policy.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_longest_accepted_ttl() {
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "STOREFRONT_SESSION_TTL_SECS").then(|| (365 * 24 * 60 * 60).to_string())
        })
        .unwrap();
        let state = AppState::new(config);
        assert_eq!(state.carts().entry_count(), 0);
    }
}
