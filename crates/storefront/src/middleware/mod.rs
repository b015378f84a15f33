//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`, capture errors and transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (reuse or generate `x-request-id`)
//! 4. Security headers (CSP, frame denial, etc.)
//! 5. Session layer (tower-sessions over a bounded moka store)

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SessionCart, create_session_layer};
