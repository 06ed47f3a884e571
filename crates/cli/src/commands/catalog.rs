//! Catalog lookups against the remote shop API.
//!
//! # Environment Variables
//!
//! - `BACKEND_API_URL` - Base URL of the shop API (defaults to production)

use std::fmt::Write as _;

use jersey_house_core::{CategoryId, ProductId};
use jersey_house_storefront::api::types::{Category, Product};
use jersey_house_storefront::api::{ApiClient, ApiError, filter_products};
use jersey_house_storefront::config::{BackendApiConfig, ConfigError};
use thiserror::Error;

/// Errors from catalog commands.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn client() -> Result<ApiClient, CatalogError> {
    Ok(ApiClient::new(&BackendApiConfig::from_env()?)?)
}

/// List products, optionally filtered.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn list(category: Option<&str>, search: Option<&str>) -> Result<String, CatalogError> {
    let products = client()?.products().await?;
    let matches = filter_products(&products, category, search);
    if matches.is_empty() {
        return Ok("No products match".to_string());
    }
    Ok(matches
        .into_iter()
        .map(product_row)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Products in one category.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn category(id: i32) -> Result<String, CatalogError> {
    let products = client()?.category_products(CategoryId::new(id)).await?;
    Ok(products
        .iter()
        .map(product_row)
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Show one product with its variants.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn show(id: i32) -> Result<String, CatalogError> {
    let product = client()?.product(ProductId::new(id)).await?;
    Ok(product_detail(&product))
}

/// List categories.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn categories() -> Result<String, CatalogError> {
    let categories = client()?.categories().await?;
    Ok(categories
        .iter()
        .map(category_row)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn product_row(product: &Product) -> String {
    format!(
        "{:>5}  {:<40}  KES {:>10.2}  {}",
        product.id,
        product.name,
        product.price,
        if product.in_stock() { "in stock" } else { "out of stock" }
    )
}

fn category_row(category: &Category) -> String {
    match category.count {
        Some(count) => format!(
            "{:>5}  {} ({count})",
            category.category_id, category.category_name
        ),
        None => format!("{:>5}  {}", category.category_id, category.category_name),
    }
}

fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.name, product.id);
    if let Some(category) = product.category_name() {
        let _ = writeln!(out, "Category: {category}");
    }
    let _ = writeln!(out, "Price:    KES {:.2}", product.price);
    let _ = writeln!(out, "Sizes:    {}", product.sizes().join(", "));
    let _ = writeln!(out, "Stock:    {}", product.total_stock());
    for variant in &product.variants {
        let _ = writeln!(
            out,
            "  {:<4} {:<16} {}",
            variant.size,
            variant.edition.as_deref().unwrap_or("-"),
            variant.stock
        );
    }
    if !product.description.is_empty() {
        let _ = write!(out, "\n{}", product.description);
    }
    out.trim_end().to_string()
}
