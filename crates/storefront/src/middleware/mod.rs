//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with an empty `request_id` field)
//! 3. Request ID (fills the span field, tags Sentry, echoes the header)
//! 4. Session layer (tower-sessions with an in-memory store)
//!
//! The [`CurrentShop`] extractor then resolves the visitor's shop from the
//! session.

pub mod request_id;
pub mod session;
pub mod shop;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
pub use shop::{CurrentShop, SHOP_KEY};
