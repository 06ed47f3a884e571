//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with the in-memory store)
//! 5. Rate limiting on `/auth` (governor)
//!
//! Extractors: [`RequireAuth`], [`RequireAdmin`] and [`CartScope`].

pub mod auth;
pub mod device;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{RequireAdmin, RequireAuth, clear_current_user, set_current_user};
pub use device::{CartScope, device_id};
pub use rate_limit::{RateLimitConfigError, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
