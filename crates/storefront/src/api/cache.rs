//! Cache types for catalog responses.

use std::sync::Arc;

use jersey_house_core::{CategoryId, ProductId};

use super::types::{Category, Product};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Featured,
    Product(ProductId),
    Categories,
    CategoryProducts(CategoryId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Arc<Vec<Product>>),
    Categories(Arc<Vec<Category>>),
}
