//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::cart::{CartService, SharedStorage};
use crate::config::StorefrontConfig;
use jersey_house_core::ChargeSchedule;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers the configuration, the
/// remote shop API client and the cart service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    carts: CartService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `storage` - Backend holding every device's carts
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built.
    pub fn new(config: StorefrontConfig, storage: SharedStorage) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.backend)?;
        let carts = CartService::new(storage, ChargeSchedule::default());

        Ok(Self {
            inner: Arc::new(AppStateInner { config, api, carts }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the remote shop API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the cart service.
    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }
}
