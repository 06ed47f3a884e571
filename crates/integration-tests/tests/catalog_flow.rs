//! Health checks and catalog browsing.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use jersey_house_integration_tests::{TestContext, amount};
use reqwest::StatusCode;
use serde_json::Value;

fn names(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, body) = browser.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = browser.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_listing_and_filters() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, all) = browser.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, jerseys) = browser.get("/products?category=jerseys").await;
    assert_eq!(
        names(&jerseys),
        ["Arsenal Home 24/25", "Harambee Stars Away"]
    );

    let (_, everything) = browser
        .get("/products?category=All%20Products&search=PREDATOR")
        .await;
    assert_eq!(names(&everything), ["Predator Boots"]);

    let (_, none) = browser.get("/products?category=Boots&search=arsenal").await;
    assert_eq!(none.as_array().unwrap().len(), 0);

    let (status, featured) = browser.get("/products/featured").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!featured.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_product_view_derives_stock_and_sizes() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, arsenal) = browser.get("/products/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(arsenal["sizes"], serde_json::json!(["M", "L", "XL"]));
    assert_eq!(arsenal["total_stock"], 12);
    assert_eq!(arsenal["in_stock"], true);
    assert_eq!(arsenal["customizable"], true);
    assert!((amount(&arsenal["price"]) - 2500.0).abs() < f64::EPSILON);

    let (_, boots) = browser.get("/products/3").await;
    assert_eq!(boots["in_stock"], false);
    assert_eq!(boots["customizable"], false);

    let (status, body) = browser.get("/products/404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_categories() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, categories) = browser.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories[0]["category_name"], "Jerseys");
    assert_eq!(categories[0]["count"], 2);

    let (_, boots) = browser.get("/categories/2/products").await;
    assert_eq!(names(&boots), ["Predator Boots"]);
}
