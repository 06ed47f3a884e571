//! The admin console.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use jersey_house_integration_tests::{Browser, TestContext, amount, mock};
use reqwest::StatusCode;
use serde_json::json;

async fn admin(ctx: &TestContext) -> Browser {
    let browser = ctx.browser();
    let (status, login) = browser.login(mock::ADMIN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["is_admin"], true);
    browser
}

fn new_product() -> serde_json::Value {
    json!({
        "name": "  Gor Mahia Home  ",
        "description": "2024/25 home shirt",
        "price": 2800,
        "category_id": 1,
        "imageUrl": "https://cdn.example/gor.jpg",
        "variants": [
            { "size": "M", "edition": "Fan Edition", "stock": 10 },
            { "size": " L ", "edition": "Fan Edition", "stock": 3 }
        ]
    })
}

#[tokio::test]
async fn test_admin_routes_require_admin_session() {
    let ctx = TestContext::new().await;

    let guest = ctx.browser();
    let (status, _) = guest.get("/admin/orders").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let customer = ctx.browser();
    customer.login(mock::CUSTOMER).await;
    let (status, body) = customer.get("/admin/orders").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (status, _) = customer.delete("/admin/products/1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(ctx.shop.products_deleted().is_empty());
}

#[tokio::test]
async fn test_orders_and_order_detail() {
    let ctx = TestContext::new().await;

    let shopper = ctx.browser();
    shopper
        .add(&json!({
            "product_id": 1,
            "size": "XL",
            "edition": "Player Edition",
            "name": "Saka",
            "number": "7"
        }))
        .await;
    let (status, _) = shopper
        .post(
            "/checkout",
            &json!({
                "name": "Kamau",
                "phone": "+254 112 345 678",
                "location": "Thika",
                "region": "ZONE 2"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let admin = admin(&ctx).await;
    let (status, orders) = admin.get("/admin/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 1);
    assert_eq!(orders[0]["id"], 1);
    assert_eq!(orders[0]["name"], "Kamau");
    assert_eq!(orders[0]["region"], "ZONE 2");
    // 2500 + 400 customization + 300 shipping + 50 packaging
    assert!((amount(&orders[0]["total_price"]) - 3250.0).abs() < f64::EPSILON);

    let (status, detail) = admin.get("/admin/orders/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["phone"], "254112345678");
    assert_eq!(detail["items"][0]["product_name"], "Arsenal Home 24/25");
    assert_eq!(detail["customization"][0]["custom_name"], "Saka");
    assert_eq!(detail["customization"][0]["custom_number"], "7");

    let (status, _) = admin.get("/admin/orders/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_categories() {
    let ctx = TestContext::new().await;
    let admin = admin(&ctx).await;

    let (status, categories) = admin.get("/admin/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories[0]["category_name"], "Jerseys");
    assert_eq!(categories[1]["count"], 1);

    let (status, products) = admin.get("/admin/categories/1/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(products.as_array().unwrap().len(), 2);

    let (status, _) = admin
        .post("/admin/categories", &json!({ "name": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = admin
        .post("/admin/categories", &json!({ "name": " Scarves " }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Category added");
    assert_eq!(ctx.shop.categories_created(), vec![json!({ "name": "Scarves" })]);
}

#[tokio::test]
async fn test_create_product_validates_and_trims() {
    let ctx = TestContext::new().await;
    let admin = admin(&ctx).await;

    let mut no_variants = new_product();
    no_variants["variants"] = json!([]);
    let (status, _) = admin.post("/admin/products", &no_variants).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut free = new_product();
    free["price"] = json!(0);
    let (status, _) = admin.post("/admin/products", &free).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut negative = new_product();
    negative["variants"][1]["stock"] = json!(-1);
    let (status, _) = admin.post("/admin/products", &negative).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(ctx.shop.products_created().is_empty());

    let (status, created) = admin.post("/admin/products", &new_product()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 101);

    let sent = &ctx.shop.products_created()[0];
    assert_eq!(sent["name"], "Gor Mahia Home");
    assert_eq!(sent["variants"][1]["size"], "L");
    assert_eq!(sent["imageUrl"], "https://cdn.example/gor.jpg");
}

#[tokio::test]
async fn test_delete_product() {
    let ctx = TestContext::new().await;
    let admin = admin(&ctx).await;

    let (status, _) = admin.delete("/admin/products/2").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(ctx.shop.products_deleted(), vec![2]);

    let (status, _) = admin.delete("/admin/products/2").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_admin() {
    let ctx = TestContext::new().await;
    let admin = admin(&ctx).await;

    let account = json!({
        "username": "mwangi",
        "email": "mwangi@example.com",
        "password": "pw"
    });
    let (status, body) = admin.post("/admin/register", &account).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Admin registered successfully");
    assert_eq!(ctx.shop.admins_registered(), vec![account]);
}
