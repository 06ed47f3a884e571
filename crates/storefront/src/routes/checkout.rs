//! Checkout route handlers.
//!
//! Orders are cash on delivery: the customer picks a shipping region, gives
//! delivery details and the cart is posted to the backend as an order.

use axum::{Json, extract::State};
use jersey_house_core::{
    CartError, DeliveryDetails, DeliveryForm, LineItem, OrderId, OrderQuote, PACKAGING_FEE, Price,
    ShippingRegion,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::api::types::OrderRequest;
use crate::cart::DeviceCart;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CartScope;
use crate::state::AppState;

/// A region the shop delivers to.
#[derive(Debug, Clone, Serialize)]
pub struct RegionView {
    pub region: ShippingRegion,
    pub name: &'static str,
    pub fee: Decimal,
}

/// Delivery regions with their fees, plus the flat packaging fee.
#[derive(Debug, Clone, Serialize)]
pub struct RegionsView {
    pub regions: Vec<RegionView>,
    pub packaging_fee: Decimal,
}

/// Quote request.
#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    pub region: String,
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub order_id: Option<OrderId>,
    pub message: String,
    pub total: Price,
}

/// List shipping regions.
pub async fn regions() -> Json<RegionsView> {
    let regions = ShippingRegion::ALL
        .iter()
        .map(|region| RegionView {
            region: *region,
            name: region.label(),
            fee: region.fee(),
        })
        .collect();
    Json(RegionsView {
        regions,
        packaging_fee: PACKAGING_FEE,
    })
}

/// Price the cart for delivery to a region.
#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    scope: CartScope,
    Json(form): Json<QuoteForm>,
) -> Result<Json<OrderQuote>> {
    let region: ShippingRegion = form.region.parse()?;
    let quote = state
        .carts()
        .read(scope.device, scope.key, move |cart| OrderQuote::for_cart(cart, region))
        .await?;
    Ok(Json(quote))
}

/// Place the order and empty the cart.
#[instrument(skip(state, form), fields(region = %form.region))]
pub async fn place_order(
    State(state): State<AppState>,
    scope: CartScope,
    Json(form): Json<DeliveryForm>,
) -> Result<Json<OrderConfirmation>> {
    let details = DeliveryDetails::try_from(form)?;
    let region = details.region;

    let (lines, quote) = state
        .carts()
        .read(scope.device, scope.key, move |cart| {
            (cart.lines().to_vec(), OrderQuote::for_cart(cart, region))
        })
        .await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".to_string()));
    }

    let order = OrderRequest::new(&lines, &details, &quote);
    let placed = state.api().place_order(&order).await?;
    info!(
        order_id = ?placed.order_id,
        total = %quote.total,
        lines = lines.len(),
        "Order placed"
    );

    // The order exists upstream; a cart left full must not fail the response.
    if let Err(err) = state
        .carts()
        .update(scope.device, scope.key, move |cart| remove_ordered(cart, &lines))
        .await
    {
        let event_id = sentry::capture_error(&err);
        error!(
            order_id = ?placed.order_id,
            error = %err,
            sentry_event_id = %event_id,
            "Failed to empty cart after order"
        );
    }
    add_breadcrumb("checkout", "Order placed", None);

    Ok(Json(OrderConfirmation {
        order_id: placed.order_id,
        message: placed
            .message
            .unwrap_or_else(|| "Order placed successfully".to_string()),
        total: quote.total,
    }))
}

/// Empty the cart of what was ordered.
///
/// Lines changed while the order was in flight stay in the cart.
fn remove_ordered(
    cart: &mut DeviceCart,
    ordered: &[LineItem],
) -> std::result::Result<(), CartError> {
    if cart.lines() == ordered {
        return cart.clear();
    }
    for line in ordered {
        let id = line.id();
        if cart.line(&id) == Some(line) {
            cart.remove(&id)?;
        }
    }
    Ok(())
}
