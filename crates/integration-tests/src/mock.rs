//! In-process stand-in for the remote shop API.
//!
//! Serves a small fixed catalog, two accounts and records every order and
//! admin write so tests can assert on what the storefront sent.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

/// Access token issued to the customer account.
pub const CUSTOMER_TOKEN: &str = "customer-token";

/// Access token issued to the admin account.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Password of both accounts.
pub const PASSWORD: &str = "secret";

/// Customer account: id 17.
pub const CUSTOMER: &str = "wanjiru";

/// Admin account: id 1.
pub const ADMIN: &str = "admin";

/// Handle on the mock's recorded state.
#[derive(Clone)]
pub struct MockShop {
    inner: Arc<Mutex<MockState>>,
}

struct MockState {
    products: Vec<Value>,
    orders: Vec<Value>,
    categories_created: Vec<Value>,
    products_created: Vec<Value>,
    products_deleted: Vec<i64>,
    admins_registered: Vec<Value>,
}

impl Default for MockShop {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                products: catalog(),
                orders: Vec::new(),
                categories_created: Vec::new(),
                products_created: Vec::new(),
                products_deleted: Vec::new(),
                admins_registered: Vec::new(),
            })),
        }
    }
}

impl MockShop {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// List an extra product alongside the fixed catalog.
    pub fn stock(&self, product: Value) {
        self.state().products.push(product);
    }

    /// Orders posted so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.state().orders.clone()
    }

    /// Categories created through the admin API.
    #[must_use]
    pub fn categories_created(&self) -> Vec<Value> {
        self.state().categories_created.clone()
    }

    /// Products created through the admin API.
    #[must_use]
    pub fn products_created(&self) -> Vec<Value> {
        self.state().products_created.clone()
    }

    /// Ids of deleted products.
    #[must_use]
    pub fn products_deleted(&self) -> Vec<i64> {
        self.state().products_deleted.clone()
    }

    /// Admin accounts registered through the admin API.
    #[must_use]
    pub fn admins_registered(&self) -> Vec<Value> {
        self.state().admins_registered.clone()
    }

    /// The API router.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/products/products", get(list_products))
            .route("/products", get(list_products).post(create_product))
            .route(
                "/products/categories",
                get(list_categories).post(create_category),
            )
            .route("/products/{id}", get(show_product).delete(delete_product))
            .route("/categories/{id}", get(category_products))
            .route("/orders", get(list_orders).post(place_order))
            .route("/orders/{id}", get(show_order))
            .route("/orders/{id}/customization", get(order_customization))
            .route("/auth/login", post(login))
            .route("/auth/signup", post(signup))
            .route("/admin/register", post(register_admin))
            .with_state(self.clone())
    }
}

fn catalog() -> Vec<Value> {
    let jerseys = json!({"id": 1, "name": "Jerseys"});
    vec![
        json!({
            "id": 1,
            "name": "Arsenal Home 24/25",
            "description": "Red with white sleeves.",
            "price": 2500,
            "image_url": "https://cdn.example/arsenal.jpg",
            "category": jerseys,
            "category_id": 1,
            "variants": [
                {"size": "M", "edition": "Fan Edition", "stock": 5},
                {"size": "L", "edition": "Fan Edition", "stock": 5},
                {"size": "XL", "edition": "Player Edition", "stock": 2}
            ]
        }),
        json!({
            "id": 2,
            "name": "Harambee Stars Away",
            "description": "",
            "price": "3000.00",
            "image_url": "https://cdn.example/harambee.jpg",
            "category": jerseys,
            "category_id": 1,
            "variants": [
                {"size": "S", "edition": "Player Edition", "stock": 4},
                {"size": "M", "edition": "Player Edition", "stock": 4}
            ]
        }),
        json!({
            "id": 3,
            "name": "Predator Boots",
            "price": 7000,
            "image_url": "",
            "category": {"id": 2, "name": "Boots"},
            "category_id": 2,
            "variants": [
                {"size": "XL", "stock": 0}
            ]
        }),
    ]
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    match bearer(headers) {
        Some(ADMIN_TOKEN) => Ok(()),
        Some(_) => Err(error(StatusCode::FORBIDDEN, "Admins only")),
        None => Err(error(StatusCode::UNAUTHORIZED, "Missing token")),
    }
}

async fn list_products(State(shop): State<MockShop>) -> Json<Value> {
    Json(Value::Array(shop.state().products.clone()))
}

async fn show_product(State(shop): State<MockShop>, Path(id): Path<i64>) -> Response {
    shop.state()
        .products
        .iter()
        .find(|p| p["id"] == id)
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn list_categories() -> Json<Value> {
    Json(json!([
        {"category_id": 1, "category_name": "Jerseys", "count": 2},
        {"category_id": 2, "category_name": "Boots", "count": 1}
    ]))
}

async fn category_products(State(shop): State<MockShop>, Path(id): Path<i64>) -> Json<Value> {
    let products = shop
        .state()
        .products
        .iter()
        .filter(|p| p["category_id"] == id)
        .cloned()
        .collect();
    Json(Value::Array(products))
}

async fn place_order(State(shop): State<MockShop>, Json(order): Json<Value>) -> Json<Value> {
    let mut state = shop.state();
    state.orders.push(order);
    let order_id = state.orders.len();
    Json(json!({
        "success": true,
        "message": "Order placed successfully",
        "order_id": order_id
    }))
}

async fn list_orders(State(shop): State<MockShop>, headers: HeaderMap) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    let summaries: Vec<Value> = shop
        .state()
        .orders
        .iter()
        .enumerate()
        .map(|(i, order)| {
            let details = &order["shipping_details"];
            json!({
                "id": i + 1,
                "name": details["name"],
                "phone": details["phone"],
                "location": details["location"],
                "region": details["region"],
                "total_price": order["total_price"]
            })
        })
        .collect();
    Json(Value::Array(summaries)).into_response()
}

fn find_order(shop: &MockShop, id: usize) -> Option<Value> {
    shop.state().orders.get(id.checked_sub(1)?).cloned()
}

async fn show_order(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Path(id): Path<usize>,
) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    let Some(order) = find_order(&shop, id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    let details = &order["shipping_details"];
    Json(json!({
        "id": id,
        "name": details["name"],
        "phone": details["phone"],
        "location": details["location"],
        "region": details["region"],
        "total_price": order["total_price"],
        "items": order["cart"]
            .as_array()
            .into_iter()
            .flatten()
            .map(|line| json!({"product_name": line["name"], "quantity": line["quantity"]}))
            .collect::<Vec<_>>()
    }))
    .into_response()
}

async fn order_customization(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Path(id): Path<usize>,
) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    let Some(order) = find_order(&shop, id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    let customized: Vec<Value> = order["cart"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|line| line["customName"] != "" || line["customNumber"] != "")
        .map(|line| {
            json!({
                "product_id": line["product_id"],
                "custom_name": line["customName"],
                "custom_number": line["customNumber"]
            })
        })
        .collect();
    Json(Value::Array(customized)).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let (token, user) = match body["identifier"].as_str() {
        Some(CUSTOMER | "wanjiru@example.com") => (
            CUSTOMER_TOKEN,
            json!({"id": 17, "username": CUSTOMER, "email": "wanjiru@example.com", "is_admin": false}),
        ),
        Some(ADMIN) => (
            ADMIN_TOKEN,
            json!({"id": 1, "username": ADMIN, "email": "admin@example.com", "is_admin": true}),
        ),
        _ => return error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    };
    Json(json!({ "access_token": token, "user": user })).into_response()
}

async fn signup(Json(body): Json<Value>) -> Response {
    if body["username"] == CUSTOMER {
        return error(StatusCode::CONFLICT, "Username already taken");
    }
    (
        StatusCode::CREATED,
        Json(json!({"message": "User registered successfully"})),
    )
        .into_response()
}

async fn create_category(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    shop.state().categories_created.push(body);
    (StatusCode::CREATED, Json(json!({"message": "Category added"}))).into_response()
}

async fn create_product(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    let mut state = shop.state();
    state.products_created.push(body.clone());
    let mut created = body;
    created["id"] = json!(100 + state.products_created.len());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_product(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    let mut state = shop.state();
    let before = state.products.len();
    state.products.retain(|p| p["id"] != id);
    if state.products.len() == before {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    state.products_deleted.push(id);
    Json(json!({"message": "Product deleted"})).into_response()
}

async fn register_admin(
    State(shop): State<MockShop>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = require_admin(&headers) {
        return rejection;
    }
    shop.state().admins_registered.push(body);
    (
        StatusCode::CREATED,
        Json(json!({"message": "Admin registered successfully"})),
    )
        .into_response()
}
