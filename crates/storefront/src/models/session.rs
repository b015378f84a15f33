//! Session-related types.
//!
//! The session itself only carries a cart id; carts live in the
//! [`CartStore`](crate::cart::CartStore).

/// Session keys.
pub mod keys {
    /// Key for the visitor's [`CartId`](crate::cart::CartId).
    pub const CART_ID: &str = "cart_id";
}
