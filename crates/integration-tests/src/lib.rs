//! End-to-end tests for the Jersey House storefront.
//!
//! Each test builds a [`TestContext`]: a [`mock::MockShop`] standing in for
//! the remote shop API, and a real storefront wired to it with carts in a
//! temporary directory. Both listen on ephemeral ports on 127.0.0.1.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jersey-house-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `cart_flow` - Adding, merging and editing cart lines
//! - `checkout_flow` - Quotes and placed orders
//! - `auth_flow` - Login, guest cart adoption and logout
//! - `catalog_flow` - Health checks, products and categories
//! - `admin_flow` - The admin console behind admin sessions

#![allow(clippy::missing_panics_doc)]

pub mod mock;

use std::net::SocketAddr;
use std::sync::Arc;

use jersey_house_storefront::cart::{FileStorage, SharedStorage};
use jersey_house_storefront::config::{BackendApiConfig, StorefrontConfig};
use jersey_house_storefront::state::AppState;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use url::Url;

use crate::mock::MockShop;

/// A storefront running against a mock shop.
pub struct TestContext {
    /// Recorded state of the mock shop API.
    pub shop: MockShop,
    base_url: Url,
    cart_dir: TempDir,
}

impl TestContext {
    /// Start the mock shop and a storefront in front of it.
    pub async fn new() -> Self {
        Self::with_storage(|storage| Arc::new(storage)).await
    }

    /// Like [`TestContext::new`], with the cart files wrapped by `wrap`.
    pub async fn with_storage(wrap: impl FnOnce(FileStorage) -> SharedStorage) -> Self {
        let shop = MockShop::default();
        let shop_addr = serve(shop.router()).await;
        let shop_url = Url::parse(&format!("http://{shop_addr}/")).expect("mock url");

        let cart_dir = tempfile::tempdir().expect("cart dir");
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: Url::parse("http://127.0.0.1").expect("base url"),
            cart_dir: cart_dir.path().to_path_buf(),
            backend: BackendApiConfig::new(shop_url),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let storage = FileStorage::open(cart_dir.path()).expect("cart storage");
        let state = AppState::new(config, wrap(storage)).expect("app state");
        let app = jersey_house_storefront::app(state).expect("app");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("storefront server");
        });

        Self {
            shop,
            base_url: Url::parse(&format!("http://{addr}")).expect("storefront url"),
            cart_dir,
        }
    }

    /// A fresh browser: its own cookie jar, so its own session and device.
    #[must_use]
    pub fn browser(&self) -> Browser {
        Browser {
            client: Client::builder()
                .cookie_store(true)
                .build()
                .expect("http client"),
            base_url: self.base_url.clone(),
        }
    }

    /// Where the storefront keeps its cart files.
    #[must_use]
    pub fn cart_dir(&self) -> &std::path::Path {
        self.cart_dir.path()
    }
}

/// One browser session against the storefront.
pub struct Browser {
    client: Client,
    base_url: Url,
}

impl Browser {
    fn url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("request url")
    }

    /// GET a path, returning the status and JSON body (`Null` when empty).
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.expect("GET");
        read(response).await
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST");
        read(response).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE");
        read(response).await
    }

    /// Log in with the shared test password.
    pub async fn login(&self, identifier: &str) -> (StatusCode, Value) {
        self.post(
            "/auth/login",
            &json!({ "identifier": identifier, "password": mock::PASSWORD }),
        )
        .await
    }

    /// Add a product to the cart.
    pub async fn add(&self, line: &Value) -> (StatusCode, Value) {
        self.post("/cart/add", line).await
    }
}

/// Numeric value of a serialized price or decimal.
#[must_use]
pub fn amount(value: &Value) -> f64 {
    let raw = value.get("amount").unwrap_or(value);
    match raw {
        Value::String(s) => s.parse().expect("decimal string"),
        other => other.as_f64().expect("number"),
    }
}

async fn serve(router: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock server");
    });
    addr
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.bytes().await.expect("response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
