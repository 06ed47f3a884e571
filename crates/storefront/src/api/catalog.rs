//! Catalog reads: products and categories.

use std::sync::Arc;

use jersey_house_core::{CategoryId, ProductId};
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::types::{Category, Product};
use super::{ApiClient, ApiError};

/// Number of products on the landing page.
const FEATURED_LIMIT: &str = "6";

impl ApiClient {
    /// All products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cache().get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let request = self.http().get(self.endpoint("products/products"));
        let products = Arc::new(self.send_json::<Vec<Product>>(request).await?);

        self.cache()
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// The newest products, for the landing page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cache().get(&CacheKey::Featured).await {
            debug!("Cache hit for featured products");
            return Ok(products);
        }

        let request = self
            .http()
            .get(self.endpoint("products"))
            .query(&[("limit", FEATURED_LIMIT), ("sort", "created_at_desc")]);
        let products = Arc::new(self.send_json::<Vec<Product>>(request).await?);

        self.cache()
            .insert(CacheKey::Featured, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }

    /// A single product with its variants.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id, or another error if
    /// the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.cache().get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let request = self.http().get(self.endpoint(&format!("products/{id}")));
        let product: Product = self.send_json(request).await?;

        self.cache()
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// All categories, with product counts when the backend reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache().get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let request = self.http().get(self.endpoint("products/categories"));
        let categories = Arc::new(self.send_json::<Vec<Category>>(request).await?);

        self.cache()
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;
        Ok(categories)
    }

    /// Products in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category_products(&self, id: CategoryId) -> Result<Arc<Vec<Product>>, ApiError> {
        let key = CacheKey::CategoryProducts(id);
        if let Some(CacheValue::Products(products)) = self.cache().get(&key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let request = self.http().get(self.endpoint(&format!("categories/{id}")));
        let products = Arc::new(self.send_json::<Vec<Product>>(request).await?);

        self.cache()
            .insert(key, CacheValue::Products(Arc::clone(&products)))
            .await;
        Ok(products)
    }
}

/// Filter a product listing by category name and a case-insensitive name
/// search, as the shop's product list does.
///
/// `"All Products"` or no category means every category; a blank search
/// matches everything.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    category: Option<&str>,
    search: Option<&str>,
) -> Vec<&'a Product> {
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_PRODUCTS));
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    products
        .iter()
        .filter(|product| {
            category.is_none_or(|wanted| {
                product
                    .category_name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(wanted))
            })
        })
        .filter(|product| {
            needle
                .as_deref()
                .is_none_or(|needle| product.name.to_lowercase().contains(needle))
        })
        .collect()
}

/// Pseudo-category that disables category filtering.
pub const ALL_PRODUCTS: &str = "All Products";

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::super::types::ProductCategory;
    use super::*;

    fn product(id: i32, name: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(2000, 0),
            image_url: String::new(),
            category: Some(ProductCategory {
                id: None,
                name: category.to_string(),
            }),
            category_id: None,
            variants: Vec::new(),
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Arsenal Home", "Jerseys"),
            product(2, "Arsenal Scarf", "Accessories"),
            product(3, "Harambee Stars Away", "Jerseys"),
        ]
    }

    fn ids(products: &[&Product]) -> Vec<i32> {
        products.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_filter_all_products() {
        let catalog = catalog();
        assert_eq!(ids(&filter_products(&catalog, None, None)), [1, 2, 3]);
        assert_eq!(
            ids(&filter_products(&catalog, Some("All Products"), Some("  "))),
            [1, 2, 3]
        );
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = catalog();
        assert_eq!(ids(&filter_products(&catalog, Some("jerseys"), None)), [1, 3]);
    }

    #[test]
    fn test_search_is_case_insensitive_and_combines_with_category() {
        let catalog = catalog();
        assert_eq!(ids(&filter_products(&catalog, None, Some("ARSENAL"))), [1, 2]);
        assert_eq!(
            ids(&filter_products(&catalog, Some("Jerseys"), Some("arsenal"))),
            [1]
        );
    }
}
