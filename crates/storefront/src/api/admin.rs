//! Admin writes. Every call carries the admin's bearer token and clears the
//! catalog cache on success.

use jersey_house_core::ProductId;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use super::types::{MessageResponse, NewCategory, NewProduct, SignupRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the category or the request
    /// fails.
    #[instrument(skip(self, token), fields(name = %category.name))]
    pub async fn create_category(
        &self,
        category: &NewCategory,
        token: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .http()
            .post(self.endpoint("products/categories"))
            .bearer_auth(token.expose_secret())
            .json(category);
        let response = self.send_json(request).await?;

        self.invalidate_catalog();
        info!("Category created");
        Ok(response)
    }

    /// Create a product. Validate it with [`NewProduct::validate`] first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product or the request
    /// fails.
    #[instrument(skip(self, product, token), fields(name = %product.name))]
    pub async fn create_product(
        &self,
        product: &NewProduct,
        token: &SecretString,
    ) -> Result<serde_json::Value, ApiError> {
        let request = self
            .http()
            .post(self.endpoint("products"))
            .bearer_auth(token.expose_secret())
            .json(product);
        let body = self.send(request).await?;

        self.invalidate_catalog();
        info!("Product created");
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::Null))
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown product, or another
    /// error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId, token: &SecretString) -> Result<(), ApiError> {
        let request = self
            .http()
            .delete(self.endpoint(&format!("products/{id}")))
            .bearer_auth(token.expose_secret());
        self.send(request).await?;

        self.invalidate_catalog();
        info!("Product deleted");
        Ok(())
    }

    /// Register another admin account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration or the
    /// request fails.
    #[instrument(skip(self, admin, token), fields(username = %admin.username))]
    pub async fn register_admin(
        &self,
        admin: &SignupRequest,
        token: &SecretString,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .http()
            .post(self.endpoint("admin/register"))
            .bearer_auth(token.expose_secret())
            .json(admin);
        self.send_json(request).await
    }
}
