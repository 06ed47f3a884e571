//! Cart behaviour through the storefront's HTTP API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use jersey_house_integration_tests::{TestContext, amount};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn arsenal(size: &str, quantity: u32) -> Value {
    json!({
        "product_id": 1,
        "quantity": quantity,
        "size": size,
        "edition": "Fan Edition"
    })
}

#[tokio::test]
async fn test_new_browser_has_empty_guest_cart() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, cart) = browser.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["key"], "guest_cart");
    assert_eq!(cart["lines"], json!([]));
    assert_eq!(cart["item_count"], 0);

    let (_, count) = browser.get("/cart/count").await;
    assert_eq!(count, json!({ "count": 0 }));
}

#[tokio::test]
async fn test_same_configuration_merges_into_one_line() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, first) = browser.add(&arsenal("M", 1)).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = browser.add(&arsenal("M", 2)).await;
    assert_eq!(first["line_id"], second["line_id"]);

    let cart = &second["cart"];
    assert_eq!(cart["line_count"], 1);
    assert_eq!(cart["item_count"], 3);
    assert_eq!(cart["lines"][0]["name"], "Arsenal Home 24/25");
    assert!((amount(&cart["subtotal"]) - 7500.0).abs() < f64::EPSILON);

    let (_, other_size) = browser.add(&arsenal("L", 1)).await;
    assert_ne!(other_size["line_id"], first["line_id"]);
    assert_eq!(other_size["cart"]["line_count"], 2);
}

#[tokio::test]
async fn test_customization_is_charged_per_unit() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, added) = browser
        .add(&json!({
            "product_id": 1,
            "quantity": 2,
            "size": "XL",
            "edition": "Player Edition",
            "badge": "Premier League",
            "name": "Saka",
            "number": "7"
        }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let line = &added["cart"]["lines"][0];
    assert_eq!(line["customization"]["name"], "Saka");
    assert_eq!(line["customization"]["badge"], "Premier League");
    assert!((amount(&line["customization_charge"]) - 500.0).abs() < f64::EPSILON);
    assert!((amount(&line["unit_total"]) - 3000.0).abs() < f64::EPSILON);
    assert!((amount(&line["line_total"]) - 6000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_update_adjust_and_remove() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (_, added) = browser.add(&arsenal("M", 1)).await;
    let line_id = added["line_id"].clone();

    let (_, cart) = browser
        .post("/cart/update", &json!({ "line_id": line_id, "quantity": 4 }))
        .await;
    assert_eq!(cart["item_count"], 4);

    let (_, cart) = browser
        .post("/cart/adjust", &json!({ "line_id": line_id, "delta": -1 }))
        .await;
    assert_eq!(cart["item_count"], 3);

    let (_, count) = browser.get("/cart/count").await;
    assert_eq!(count["count"], 3);

    let (status, cart) = browser
        .post("/cart/remove", &json!({ "line_id": line_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["lines"], json!([]));

    let (status, body) = browser
        .post("/cart/remove", &json!({ "line_id": line_id }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_zero_quantity_removes_line() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (_, added) = browser.add(&arsenal("M", 2)).await;
    let (status, cart) = browser
        .post(
            "/cart/update",
            &json!({ "line_id": added["line_id"], "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["line_count"], 0);
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    browser.add(&arsenal("M", 1)).await;
    browser.add(&arsenal("L", 1)).await;

    let (status, cart) = browser.post("/cart/clear", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 0);
}

#[tokio::test]
async fn test_add_rejects_bad_selections() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();

    let (status, _) = browser
        .add(&json!({ "product_id": 1, "size": "M" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "edition is required");

    let (status, _) = browser
        .add(&json!({ "product_id": 1, "edition": "Fan Edition" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "size is required");

    let (status, _) = browser.add(&arsenal("S", 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "arsenal has no S");

    let (status, _) = browser
        .add(&json!({ "product_id": 3, "size": "XL", "edition": "Fan Edition" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "boots are out of stock");

    let (status, _) = browser
        .add(&json!({ "product_id": 99, "size": "M", "edition": "Fan Edition" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, cart) = browser.get("/cart").await;
    assert_eq!(cart["line_count"], 0);
}

#[tokio::test]
async fn test_lowercase_variant_size_is_accepted() {
    let ctx = TestContext::new().await;
    ctx.shop.stock(json!({
        "id": 4,
        "name": "Gor Mahia Home",
        "price": 2200,
        "image_url": "",
        "category": {"id": 1, "name": "Jerseys"},
        "category_id": 1,
        "variants": [{"size": "xl", "edition": "Fan Edition", "stock": 3}]
    }));
    let browser = ctx.browser();

    let (status, added) = browser
        .add(&json!({ "product_id": 4, "size": "XL", "edition": "Fan Edition" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{added}");

    let (status, _) = browser
        .add(&json!({ "product_id": 4, "size": "M", "edition": "Fan Edition" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "only xl is listed");

    let (_, cart) = browser.get("/cart").await;
    assert_eq!(cart["line_count"], 1);
    assert_eq!(cart["lines"][0]["size"], "XL");
}

#[tokio::test]
async fn test_free_text_variant_size_takes_any_kit_size() {
    let ctx = TestContext::new().await;
    ctx.shop.stock(json!({
        "id": 5,
        "name": "Harambee Stars Scarf Jersey",
        "price": 1500,
        "image_url": "",
        "category": {"id": 1, "name": "Jerseys"},
        "category_id": 1,
        "variants": [{"size": "One Size", "stock": 10}]
    }));
    let browser = ctx.browser();

    let (status, added) = browser
        .add(&json!({ "product_id": 5, "size": "L", "edition": "Fan Edition" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{added}");

    let (_, cart) = browser.get("/cart").await;
    assert_eq!(cart["item_count"], 1);
}

#[tokio::test]
async fn test_browsers_have_separate_guest_carts() {
    let ctx = TestContext::new().await;
    let alice = ctx.browser();
    let bob = ctx.browser();

    alice.add(&arsenal("M", 2)).await;
    bob.add(&arsenal("L", 1)).await;

    let (_, alice_cart) = alice.get("/cart").await;
    let (_, bob_cart) = bob.get("/cart").await;
    assert_eq!(alice_cart["item_count"], 2);
    assert_eq!(bob_cart["item_count"], 1);
    assert_eq!(alice_cart["lines"][0]["size"], "M");
    assert_eq!(bob_cart["lines"][0]["size"], "L");
}

#[tokio::test]
async fn test_cart_survives_on_disk() {
    let ctx = TestContext::new().await;
    let browser = ctx.browser();
    browser.add(&arsenal("M", 1)).await;

    let files = std::fs::read_dir(ctx.cart_dir()).unwrap().count();
    assert_eq!(files, 1);
}
