//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (Telegram WebApp origins)
//!
//! The calling shopper is resolved per handler by the [`CurrentUser`]
//! extractor.

pub mod current_user;
pub mod request_id;

pub use current_user::CurrentUser;
pub use request_id::request_id_middleware;
