//! Corner Shop Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! product identifiers, cart quantities, and prices.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no session access.
//! Everything here is deterministic and can be unit tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, quantities, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
