//! Cart route handlers.
//!
//! Every handler works on the cart selected by [`CartScope`]: the logged-in
//! user's cart, or this browser's guest cart. Mutations answer with the
//! updated cart so the client never has to refetch.

use axum::{Json, extract::State};
use jersey_house_core::{
    Badge, Customization, FontType, KitEdition, KitSize, LineId, LineItem, Price, ProductId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::cart::DeviceCart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CartScope;
use crate::state::AppState;

/// One cart line with its derived prices.
#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    pub id: LineId,
    #[serde(flatten)]
    pub item: LineItem,
    /// Per-unit surcharge for the customization.
    pub customization_charge: Decimal,
    pub unit_total: Price,
    pub line_total: Price,
}

/// The cart as shown on the cart page.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub key: String,
    pub lines: Vec<LineView>,
    pub line_count: usize,
    pub item_count: u32,
    pub subtotal: Price,
}

impl CartView {
    /// Snapshot a cart.
    #[must_use]
    pub fn of(cart: &DeviceCart) -> Self {
        let lines = cart
            .lines()
            .iter()
            .map(|line| LineView {
                id: line.id(),
                item: line.clone(),
                customization_charge: cart.customization_charge(line),
                unit_total: cart.unit_total(line),
                line_total: cart.line_total(line),
            })
            .collect();

        Self {
            key: cart.key().to_string(),
            lines,
            line_count: cart.line_count(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// Result of adding to the cart.
#[derive(Debug, Clone, Serialize)]
pub struct AddedView {
    /// The line the item landed on (new or merged).
    pub line_id: LineId,
    pub cart: CartView,
}

/// Add to cart request, as sent by the product page.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub size: Option<String>,
    pub edition: Option<String>,
    pub badge: Option<String>,
    pub font: Option<String>,
    /// Name to print on the shirt.
    pub name: Option<String>,
    /// Number to print on the shirt.
    pub number: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

/// Set quantity request.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: LineId,
    pub quantity: u32,
}

/// Increment/decrement request.
#[derive(Debug, Deserialize)]
pub struct AdjustCartForm {
    pub line_id: LineId,
    pub delta: i64,
}

/// Remove line request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: LineId,
}

/// Display the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, scope: CartScope) -> Result<Json<CartView>> {
    let view = state
        .carts()
        .read(scope.device, scope.key, CartView::of)
        .await?;
    Ok(Json(view))
}

/// Number of units in the cart, for the header badge.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>, scope: CartScope) -> Result<Json<Value>> {
    let count = state
        .carts()
        .read(scope.device, scope.key, DeviceCart::item_count)
        .await?;
    Ok(Json(json!({ "count": count })))
}

/// Add a configured product to the cart.
///
/// The product is fetched from the catalog so the name, price and image on
/// the line are the shop's, not the client's.
#[instrument(skip(state, form), fields(product_id = %form.product_id, quantity = form.quantity))]
pub async fn add(
    State(state): State<AppState>,
    scope: CartScope,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<AddedView>> {
    let edition = KitEdition::parse_required(form.edition.as_deref())?;
    let size = KitSize::parse_required(form.size.as_deref())?;
    let badge = Badge::parse_optional(form.badge.as_deref())?;
    let font = FontType::parse_optional(form.font.as_deref())?;

    let product = state.api().product(form.product_id).await?;
    if !product.in_stock() {
        return Err(AppError::Conflict(format!("{} is out of stock", product.name)));
    }
    if !product.offers_size(size) {
        return Err(AppError::BadRequest(format!(
            "{} is not available in size {size}",
            product.name
        )));
    }

    let item = LineItem {
        product_id: product.id,
        name: product.name,
        unit_price: Price::kes(product.price),
        quantity: form.quantity,
        size: size.label().to_string(),
        edition: edition.label().to_string(),
        customization: Customization::new(
            form.name,
            form.number,
            font.map(|f| f.label().to_string()),
            badge.map(|b| b.label().to_string()),
        ),
        image_url: product.image_url,
    };

    let product_id = item.product_id.to_string();
    let added = state
        .carts()
        .update(scope.device, scope.key, move |cart| {
            let line_id = cart.add(item)?;
            Ok(AddedView {
                line_id,
                cart: CartView::of(cart),
            })
        })
        .await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", &product_id)]));
    Ok(Json(added))
}

/// Set a line's quantity; zero removes the line.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    scope: CartScope,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let view = state
        .carts()
        .update(scope.device, scope.key, move |cart| {
            cart.update_quantity(&form.line_id, form.quantity)?;
            Ok(CartView::of(cart))
        })
        .await?;
    Ok(Json(view))
}

/// The +/- controls on the cart page.
#[instrument(skip(state))]
pub async fn adjust(
    State(state): State<AppState>,
    scope: CartScope,
    Json(form): Json<AdjustCartForm>,
) -> Result<Json<CartView>> {
    let view = state
        .carts()
        .update(scope.device, scope.key, move |cart| {
            cart.adjust_quantity(&form.line_id, form.delta)?;
            Ok(CartView::of(cart))
        })
        .await?;
    Ok(Json(view))
}

/// Remove a line.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    scope: CartScope,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let view = state
        .carts()
        .update(scope.device, scope.key, move |cart| {
            cart.remove(&form.line_id)?;
            Ok(CartView::of(cart))
        })
        .await?;
    Ok(Json(view))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, scope: CartScope) -> Result<Json<CartView>> {
    let view = state
        .carts()
        .update(scope.device, scope.key, |cart| {
            cart.clear()?;
            Ok(CartView::of(cart))
        })
        .await?;
    Ok(Json(view))
}
