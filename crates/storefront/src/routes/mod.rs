//! HTTP route handlers for the storefront.
//!
//! Every endpoint speaks JSON; errors are `{"error": "..."}`.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                           - Liveness check
//! GET    /health/ready                     - Cart storage check
//!
//! # Catalog
//! GET    /products?category=&search=       - Product listing
//! GET    /products/featured                - Newest products
//! GET    /products/{id}                    - Product detail
//! GET    /categories                       - Category listing
//! GET    /categories/{id}/products         - Products in a category
//!
//! # Cart (session scoped)
//! GET    /cart                             - Cart with prices
//! GET    /cart/count                       - Units in cart
//! POST   /cart/add                         - Add a configured product
//! POST   /cart/update                      - Set a line's quantity
//! POST   /cart/adjust                      - Increment/decrement a line
//! POST   /cart/remove                      - Remove a line
//! POST   /cart/clear                       - Empty the cart
//!
//! # Checkout
//! GET    /checkout/regions                 - Shipping regions and fees
//! POST   /checkout/quote                   - Price the cart for a region
//! POST   /checkout                         - Place a cash on delivery order
//!
//! # Auth (rate limited)
//! POST   /auth/login                       - Log in, merge guest cart
//! POST   /auth/signup                      - Create account
//! POST   /auth/logout                      - Log out
//! GET    /auth/me                          - Current user
//!
//! # Admin (requires admin session)
//! GET    /admin/orders                     - Order list
//! GET    /admin/orders/{id}                - Order detail
//! GET    /admin/categories                 - Categories with counts
//! POST   /admin/categories                 - Create category
//! GET    /admin/categories/{id}/products   - Products in a category
//! POST   /admin/products                   - Create product
//! DELETE /admin/products/{id}              - Delete product
//! POST   /admin/register                   - Register another admin
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::{RateLimitConfigError, auth_rate_limiter};
use crate::state::AppState;

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::categories))
        .route("/{id}/products", get(products::category_products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/adjust", post(cart::adjust))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/regions", get(checkout::regions))
        .route("/quote", post(checkout::quote))
}

/// Create the auth routes router, behind the auth rate limiter.
///
/// # Errors
///
/// Returns an error if the rate limiter cannot be configured.
pub fn auth_routes() -> Result<Router<AppState>, RateLimitConfigError> {
    Ok(Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(auth_rate_limiter()?))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(admin::orders))
        .route("/orders/{id}", get(admin::order))
        .route(
            "/categories",
            get(admin::categories).post(admin::create_category),
        )
        .route("/categories/{id}/products", get(admin::category_products))
        .route("/products", post(admin::create_product))
        .route("/products/{id}", delete(admin::delete_product))
        .route("/register", post(admin::register_admin))
}

/// Create all routes for the storefront.
///
/// # Errors
///
/// Returns an error if the rate limiter cannot be configured.
pub fn routes() -> Result<Router<AppState>, RateLimitConfigError> {
    Ok(Router::new()
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes()?)
        .nest("/admin", admin_routes()))
}
