//! Admin console route handlers.
//!
//! Every handler requires an admin session; the session's access token is
//! forwarded to the backend, which enforces the same rule.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use jersey_house_core::{CategoryId, OrderId, ProductId};
use serde_json::Value;
use tracing::{info, instrument};

use crate::api::types::{
    Category, MessageResponse, NewCategory, NewProduct, OrderDetail, OrderSummary, SignupRequest,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Every order.
#[instrument(skip(state, admin), fields(admin_id = %admin.user.id))]
pub async fn orders(
    State(state): State<AppState>,
    admin: RequireAdmin,
) -> Result<Json<Vec<OrderSummary>>> {
    Ok(Json(state.api().orders(&admin.token).await?))
}

/// One order with its items and customization.
#[instrument(skip(state, admin), fields(admin_id = %admin.user.id))]
pub async fn order(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    Ok(Json(state.api().order(id, &admin.token).await?))
}

/// Categories with their product counts.
#[instrument(skip(state, _admin))]
pub async fn categories(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Category>>> {
    let categories = state.api().categories().await?;
    Ok(Json(categories.as_ref().clone()))
}

/// Products in one category.
#[instrument(skip(state, _admin))]
pub async fn category_products(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.api().category_products(id).await?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Create a category.
#[instrument(skip(state, admin, category), fields(admin_id = %admin.user.id))]
pub async fn create_category(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Json(mut category): Json<NewCategory>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    category.name = category.name.trim().to_string();
    if category.name.is_empty() {
        return Err(AppError::BadRequest("Category name is required".to_string()));
    }

    let response = state.api().create_category(&category, &admin.token).await?;
    info!(name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(response)))
}

/// Create a product.
#[instrument(skip(state, admin, product), fields(admin_id = %admin.user.id))]
pub async fn create_product(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Json(mut product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Value>)> {
    product.validate()?;
    let created = state.api().create_product(&product, &admin.token).await?;
    info!(name = %product.name, variants = product.variants.len(), "Product created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a product.
#[instrument(skip(state, admin), fields(admin_id = %admin.user.id))]
pub async fn delete_product(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.api().delete_product(id, &admin.token).await?;
    info!(product_id = %id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Register another admin.
#[instrument(skip(state, admin, account), fields(admin_id = %admin.user.id, username = %account.username))]
pub async fn register_admin(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Json(account): Json<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if account.username.trim().is_empty()
        || account.email.trim().is_empty()
        || account.password.is_empty()
    {
        return Err(AppError::BadRequest(
            "Username, email and password are required".to_string(),
        ));
    }

    let response = state.api().register_admin(&account, &admin.token).await?;
    info!("Admin registered");
    Ok((StatusCode::CREATED, Json(response)))
}
