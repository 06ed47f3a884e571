//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use jersey_house_core::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::filter_products;
use crate::api::types::{Category, Product};
use crate::error::Result;
use crate::state::AppState;

/// A product with the fields the product page derives from its variants.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub sizes: Vec<String>,
    pub total_stock: u32,
    pub in_stock: bool,
    pub customizable: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            sizes: product.sizes().into_iter().map(String::from).collect(),
            total_stock: product.total_stock(),
            in_stock: product.in_stock(),
            customizable: product.is_jersey(),
            product: product.clone(),
        }
    }
}

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Category name; "All Products" or absent means every category.
    pub category: Option<String>,
    /// Case-insensitive match on the product name.
    pub search: Option<String>,
}

/// List products, optionally filtered by category and name.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.api().products().await?;
    let views = filter_products(
        &products,
        query.category.as_deref(),
        query.search.as_deref(),
    )
    .into_iter()
    .map(ProductView::from)
    .collect();
    Ok(Json(views))
}

/// The newest products, for the home page.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let products = state.api().featured_products().await?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// One product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductView>> {
    let product = state.api().product(id).await?;
    Ok(Json(ProductView::from(&product)))
}

/// Every category.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = state.api().categories().await?;
    Ok(Json(categories.as_ref().clone()))
}

/// Products in one category.
#[instrument(skip(state))]
pub async fn category_products(
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<Json<Vec<ProductView>>> {
    let products = state.api().category_products(id).await?;
    Ok(Json(products.iter().map(ProductView::from).collect()))
}
