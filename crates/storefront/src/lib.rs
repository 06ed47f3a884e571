//! Jersey House Storefront library.
//!
//! The storefront is a JSON backend-for-frontend: it proxies the remote shop
//! API for the catalog, orders and accounts, and owns the session carts,
//! which the remote API never sees until checkout.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use middleware::RateLimitConfigError;
use state::AppState;

/// Build the storefront application.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so
/// the rate limiter can fall back to the peer address.
///
/// # Errors
///
/// Returns an error if the rate limiter cannot be configured.
pub fn app(state: AppState) -> Result<Router, RateLimitConfigError> {
    let session_layer = middleware::create_session_layer(state.config());

    Ok(Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes()?)
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction()))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if cart storage is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.carts().ready().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "Cart storage not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
