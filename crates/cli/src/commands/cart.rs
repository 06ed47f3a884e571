//! Cart inspection and repair commands.
//!
//! Works directly on the storefront's cart directory, so it can be used
//! while the storefront is stopped, or to look at a customer's cart when
//! handling a support request.
//!
//! # Usage
//!
//! ```bash
//! # Every cart on disk, per device
//! jh-cli cart --dir data/carts list
//!
//! # One device's guest cart
//! jh-cli cart --device 6f1c... show
//!
//! # A user's cart on a device
//! jh-cli cart --device 6f1c... --user 17 quote --region "ZONE 4"
//! ```

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jersey_house_core::{
    Badge, CartError, CartKey, CartStorage, ChargeSchedule, Customization, DeliveryError,
    FontType, KitEdition, KitSize, LineId, LineItem, OrderQuote, Price, ProductId,
    SelectionError, SessionCart, ShippingRegion, StorageError,
};
use jersey_house_storefront::api::{ApiClient, ApiError};
use jersey_house_storefront::cart::{DeviceId, FileStorage, ScopedStorage, split_key};
use jersey_house_storefront::config::{BackendApiConfig, ConfigError};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog lookup failed: {0}")]
    Api(#[from] ApiError),

    /// Offline adds need both a name and a price.
    #[error("--name and --price must be given together")]
    IncompleteProduct,
}

type CliCart = SessionCart<Arc<dyn CartStorage>>;

/// Which cart a command works on.
#[derive(Debug, Clone)]
pub struct CartTarget {
    /// The storefront's cart directory.
    pub dir: PathBuf,
    /// Device partition; `None` addresses unpartitioned keys.
    pub device: Option<DeviceId>,
    pub key: CartKey,
}

impl CartTarget {
    fn open(&self) -> Result<CliCart, CartCommandError> {
        let files = FileStorage::open(&self.dir)?;
        let storage: Arc<dyn CartStorage> = match self.device {
            Some(device) => Arc::new(ScopedStorage::new(files, device)),
            None => Arc::new(files),
        };
        Ok(SessionCart::open_with(
            storage,
            self.key,
            ChargeSchedule::default(),
        )?)
    }
}

/// What to put in the cart.
#[derive(Debug, Clone, Default)]
pub struct NewLine {
    pub product_id: i32,
    pub quantity: u32,
    pub size: Option<String>,
    pub edition: Option<String>,
    pub badge: Option<String>,
    pub font: Option<String>,
    pub custom_name: Option<String>,
    pub custom_number: Option<String>,
    /// Product name; looked up in the catalog when absent.
    pub name: Option<String>,
    /// Unit price in KES; looked up in the catalog when absent.
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
}

/// Render the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be opened.
pub fn show(target: &CartTarget) -> Result<String, CartCommandError> {
    Ok(render(&target.open()?))
}

/// Add a line.
///
/// # Errors
///
/// Returns an error if the selection is invalid, the product lookup fails
/// or the cart cannot be written.
pub async fn add(target: &CartTarget, line: NewLine) -> Result<String, CartCommandError> {
    let edition = KitEdition::parse_required(line.edition.as_deref())?;
    let size = KitSize::parse_required(line.size.as_deref())?;
    let badge = Badge::parse_optional(line.badge.as_deref())?;
    let font = FontType::parse_optional(line.font.as_deref())?;

    let (name, price, image_url) = match (line.name, line.price) {
        (Some(name), Some(price)) => (name, price, line.image_url.unwrap_or_default()),
        (None, None) => {
            let api = ApiClient::new(&BackendApiConfig::from_env()?)?;
            let product = api.product(ProductId::new(line.product_id)).await?;
            tracing::info!(product = %product.name, "Fetched product from catalog");
            (product.name, product.price, product.image_url)
        }
        _ => return Err(CartCommandError::IncompleteProduct),
    };

    let item = LineItem {
        product_id: ProductId::new(line.product_id),
        name,
        unit_price: Price::kes(price),
        quantity: line.quantity,
        size: size.label().to_string(),
        edition: edition.label().to_string(),
        customization: Customization::new(
            line.custom_name,
            line.custom_number,
            font.map(|f| f.label().to_string()),
            badge.map(|b| b.label().to_string()),
        ),
        image_url,
    };

    let mut cart = target.open()?;
    let id = cart.add(item)?;
    Ok(format!("Added to line {id}\n\n{}", render(&cart)))
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the line does not exist or the cart cannot be written.
pub fn remove(target: &CartTarget, line: &str) -> Result<String, CartCommandError> {
    let mut cart = target.open()?;
    let removed = cart.remove(&LineId::new(line))?;
    Ok(format!("Removed {}\n\n{}", removed.name, render(&cart)))
}

/// Set a line's quantity; zero removes it.
///
/// # Errors
///
/// Returns an error if the line does not exist or the cart cannot be written.
pub fn set_quantity(
    target: &CartTarget,
    line: &str,
    quantity: u32,
) -> Result<String, CartCommandError> {
    let mut cart = target.open()?;
    cart.update_quantity(&LineId::new(line), quantity)?;
    Ok(render(&cart))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be written.
pub fn clear(target: &CartTarget) -> Result<String, CartCommandError> {
    let mut cart = target.open()?;
    cart.clear()?;
    Ok(format!("Cleared {}", cart.key()))
}

/// Price the cart for delivery to a region.
///
/// # Errors
///
/// Returns an error if the region is unknown or the cart cannot be opened.
pub fn quote(target: &CartTarget, region: &str) -> Result<String, CartCommandError> {
    let region: ShippingRegion = region.parse()?;
    let quote = OrderQuote::for_cart(&target.open()?, region);

    let mut out = String::new();
    let _ = writeln!(out, "Items:      {}", quote.items);
    let _ = writeln!(out, "Shipping:   {} ({region})", quote.shipping);
    let _ = writeln!(out, "Packaging:  {}", quote.packaging);
    let _ = write!(out, "Total:      {}", quote.total);
    Ok(out)
}

/// List every cart in the directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list(dir: &Path) -> Result<String, CartCommandError> {
    let files = FileStorage::open(dir)?;
    let keys = files.keys()?;
    if keys.is_empty() {
        return Ok("No carts".to_string());
    }

    let mut out = String::new();
    for raw in keys {
        let (device, key) = match split_key(&raw) {
            Some((device, key)) => (Some(device), key),
            None => (None, raw.as_str()),
        };
        let Some(key) = CartKey::parse(key) else {
            let _ = writeln!(out, "{raw}  (not a cart)");
            continue;
        };

        let target = CartTarget {
            dir: files.root().to_path_buf(),
            device,
            key,
        };
        let cart = target.open()?;
        let device = device.map_or_else(|| "-".to_string(), |d| d.to_string());
        let _ = writeln!(
            out,
            "{device}  {key}  {} item(s)  {}",
            cart.item_count(),
            cart.subtotal()
        );
    }
    Ok(out.trim_end().to_string())
}

/// Human-readable cart contents.
fn render(cart: &CliCart) -> String {
    if cart.is_empty() {
        return format!("{} is empty", cart.key());
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", cart.key());
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "  [{}] {} x {} ({}, {})  {}",
            line.id(),
            line.quantity,
            line.name,
            line.size,
            line.edition,
            cart.line_total(line)
        );
        for (label, amount) in cart.schedule().breakdown(&line.customization) {
            let value = match label {
                "Badge" => line.customization.badge.as_deref(),
                "Name" => line.customization.name.as_deref(),
                "Number" => line.customization.number.as_deref(),
                _ => line.customization.font.as_deref(),
            };
            let _ = writeln!(
                out,
                "      {label}: {}  +{amount}",
                value.unwrap_or_default()
            );
        }
    }
    let _ = write!(
        out,
        "{} item(s), subtotal {}",
        cart.item_count(),
        cart.subtotal()
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn target(dir: &Path) -> CartTarget {
        CartTarget {
            dir: dir.to_path_buf(),
            device: Some(DeviceId::random()),
            key: CartKey::Guest,
        }
    }

    fn offline_line() -> NewLine {
        NewLine {
            product_id: 3,
            quantity: 2,
            size: Some("XL".to_string()),
            edition: Some("Player Edition".to_string()),
            custom_name: Some("Wanyama".to_string()),
            name: Some("Harambee Stars Home".to_string()),
            price: Some(Decimal::new(3500, 0)),
            ..NewLine::default()
        }
    }

    #[tokio::test]
    async fn test_add_show_and_quote() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path());

        let added = add(&target, offline_line()).await.unwrap();
        assert!(added.contains("Harambee Stars Home"));

        let shown = show(&target).unwrap();
        assert!(shown.contains("2 x Harambee Stars Home (XL, Player Edition)"));
        assert!(shown.contains("Name: Wanyama  +200"));
        assert!(shown.contains("subtotal KES 7400.00"));

        let quoted = quote(&target, "zone 4").unwrap();
        assert!(quoted.contains("Total:      KES 8150.00"));
    }

    #[tokio::test]
    async fn test_add_requires_edition_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let line = NewLine {
            edition: None,
            ..offline_line()
        };
        let err = add(&target(dir.path()), line).await.unwrap_err();
        assert!(matches!(err, CartCommandError::Selection(SelectionError::Missing(_))));
    }

    #[tokio::test]
    async fn test_add_rejects_half_offline_product() {
        let dir = tempfile::tempdir().unwrap();
        let line = NewLine {
            price: None,
            ..offline_line()
        };
        let err = add(&target(dir.path()), line).await.unwrap_err();
        assert!(matches!(err, CartCommandError::IncompleteProduct));
    }

    #[tokio::test]
    async fn test_list_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let target = target(dir.path());
        add(&target, offline_line()).await.unwrap();

        let listing = list(dir.path()).unwrap();
        let device = target.device.unwrap().to_string();
        assert!(listing.contains(&format!("{device}  guest_cart  2 item(s)")));

        assert_eq!(clear(&target).unwrap(), "Cleared guest_cart");
        assert_eq!(show(&target).unwrap(), "guest_cart is empty");
    }

    #[test]
    fn test_remove_unknown_line() {
        let dir = tempfile::tempdir().unwrap();
        let err = remove(&target(dir.path()), "0123456789abcdef").unwrap_err();
        assert!(matches!(err, CartCommandError::Cart(CartError::LineNotFound(_))));
    }
}
