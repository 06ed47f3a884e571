//! Order placement and the admin order views.

use jersey_house_core::OrderId;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::types::{OrderDetail, OrderPlaced, OrderRequest, OrderSummary};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Place an order for cash on delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend does not report
    /// success.
    #[instrument(skip(self, order), fields(lines = order.cart.len(), total = %order.total_price))]
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderPlaced, ApiError> {
        let request = self.http().post(self.endpoint("orders")).json(order);
        let placed: OrderPlaced = self.send_json(request).await?;

        if !placed.success {
            return Err(ApiError::Api {
                status: 422,
                message: placed
                    .message
                    .unwrap_or_else(|| "Failed to place order.".to_string()),
            });
        }
        Ok(placed)
    }

    /// Every order, for the admin console.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &SecretString) -> Result<Vec<OrderSummary>, ApiError> {
        let request = self
            .http()
            .get(self.endpoint("orders"))
            .bearer_auth(token.expose_secret());
        self.send_json(request).await
    }

    /// One order with its customization details.
    ///
    /// # Errors
    ///
    /// Returns an error if either API request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId, token: &SecretString) -> Result<OrderDetail, ApiError> {
        let detail = self
            .http()
            .get(self.endpoint(&format!("orders/{id}")))
            .bearer_auth(token.expose_secret());
        let customization = self
            .http()
            .get(self.endpoint(&format!("orders/{id}/customization")))
            .bearer_auth(token.expose_secret());

        let (detail, customization) = tokio::join!(
            self.send_json::<OrderDetail>(detail),
            self.send_json::<serde_json::Value>(customization)
        );

        let mut detail = detail?;
        detail.customization = customization?;
        Ok(detail)
    }
}
