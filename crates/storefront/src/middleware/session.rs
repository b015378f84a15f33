//! Session middleware configuration and the session cart extractor.
//!
//! Sessions are held in a bounded moka cache and identified by a signed
//! cookie. The only value stored in a session is the visitor's cart id.
//! Records are evicted once their expiry passes or the cache is full.
//!
//! The session is written once, when the cart id is assigned, so the cookie
//! and the record expire a fixed window after the first visit. That is the
//! same window the [`CartStore`](crate::cart::CartStore) gives the cart.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::ExposeSecret;
use tokio::sync::MutexGuard;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::cart::{Cart, CartHandle, CartId, DEFAULT_MAX_CARTS};
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::models::session_keys;
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "cs_session";

/// Upper bound on concurrently held sessions; one cart per session.
pub const MAX_SESSIONS: u64 = DEFAULT_MAX_CARTS;

/// The session store: an expiring moka cache bounded by [`MAX_SESSIONS`].
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer over [`session_store`].
///
/// Uses the configured secret to sign cookies, or a random per-process key
/// when none is configured (sessions then do not survive a restart, which
/// the in-memory store already implies).
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> SessionManagerLayer<MokaStore, SignedCookie> {
    let key = config.session_secret.as_ref().map_or_else(
        || {
            tracing::warn!("STOREFRONT_SESSION_SECRET not set, using a random session key");
            Key::generate()
        },
        |secret| Key::from(secret.expose_secret().as_bytes()),
    );

    let ttl = i64::try_from(config.session_ttl.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(ttl),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

/// Extractor for the current visitor's cart.
///
/// Assigns a new cart id to the session on first access. Handlers lock the
/// cart for the duration of a read-modify-write so concurrent requests from
/// the same session cannot lose updates.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(cart: SessionCart) -> String {
///     format!("{} items", cart.lock().await.count())
/// }
/// ```
pub struct SessionCart {
    id: CartId,
    cart: CartHandle,
}

impl SessionCart {
    /// The cart id stored in the session.
    #[must_use]
    pub const fn id(&self) -> CartId {
        self.id
    }

    /// Lock the cart for reading or mutation.
    pub async fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().await
    }
}

impl FromRequestParts<AppState> for SessionCart {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        let id = if let Some(id) = session.get::<CartId>(session_keys::CART_ID).await? {
            id
        } else {
            let id = CartId::generate();
            session.insert(session_keys::CART_ID, id).await?;
            tracing::debug!(cart_id = %id, carts = state.carts().entry_count(), "Assigned cart to session");
            id
        };

        let cart = state.carts().cart(id).await;
        Ok(Self { id, cart })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record_expiring_in(lifetime: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + lifetime,
        }
    }

    #[tokio::test]
    async fn test_expired_session_record_is_evicted() {
        let store = session_store();
        let mut record = record_expiring_in(Duration::seconds(1));
        store.create(&mut record).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_some());

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_live_session_record_is_kept() {
        let store = session_store();
        let mut record = record_expiring_in(Duration::hours(1));
        store.create(&mut record).await.unwrap();

        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
    }
}
