//! Wire types of the remote shop API.
//!
//! Field names follow the backend's JSON exactly, including its mix of
//! `snake_case` and `camelCase`.

use jersey_house_core::{
    CategoryId, DeliveryDetails, KitSize, LineItem, OrderId, OrderQuote, ProductId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: Option<ProductCategory>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Sizes offered across all variants, without duplicates, in listing order.
    #[must_use]
    pub fn sizes(&self) -> Vec<&str> {
        let mut sizes: Vec<&str> = Vec::new();
        for variant in &self.variants {
            if !sizes.contains(&variant.size.as_str()) {
                sizes.push(&variant.size);
            }
        }
        sizes
    }

    /// Whether `size` can be ordered.
    ///
    /// Variant sizes are free text. Only those naming a kit size restrict the
    /// choice, matched case-insensitively; a product listing none takes any size.
    #[must_use]
    pub fn offers_size(&self, size: KitSize) -> bool {
        let listed: Vec<KitSize> = self
            .variants
            .iter()
            .filter_map(|variant| variant.size.parse().ok())
            .collect();
        listed.is_empty() || listed.contains(&size)
    }

    /// Units in stock across all variants.
    #[must_use]
    pub fn total_stock(&self) -> u32 {
        self.variants
            .iter()
            .fold(0_u32, |total, variant| total.saturating_add(variant.stock))
    }

    /// Products without variants are not stock-tracked and count as available.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.variants.is_empty() || self.total_stock() > 0
    }

    /// Name of the product's category, if the backend included it.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Whether this product offers jersey personalization.
    #[must_use]
    pub fn is_jersey(&self) -> bool {
        self.category_name()
            .is_some_and(|name| name.eq_ignore_ascii_case("Jerseys"))
    }
}

/// Category embedded in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub name: String,
}

/// One stock-keeping variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub size: String,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub stock: u32,
}

/// A category as listed by the backend, with its product count when the
/// backend reports one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "id")]
    pub category_id: CategoryId,
    #[serde(alias = "name")]
    pub category_name: String,
    #[serde(default)]
    pub count: Option<u32>,
}

// =============================================================================
// Orders
// =============================================================================

/// Order as posted to `POST /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub cart: Vec<OrderLine>,
    pub shipping_details: ShippingDetails,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl OrderRequest {
    /// Build the order payload for a cart's lines, delivery details and quote.
    #[must_use]
    pub fn new(lines: &[LineItem], delivery: &DeliveryDetails, quote: &OrderQuote) -> Self {
        Self {
            cart: lines.iter().map(OrderLine::from).collect(),
            shipping_details: ShippingDetails::from(delivery),
            total_price: quote.total.amount,
        }
    }
}

/// One ordered line. Absent customizations are sent as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub size: String,
    pub edition: String,
    #[serde(rename = "customName")]
    pub custom_name: String,
    #[serde(rename = "customNumber")]
    pub custom_number: String,
    #[serde(rename = "fontType")]
    pub font_type: String,
    pub badge: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<&LineItem> for OrderLine {
    fn from(line: &LineItem) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            size: or_not_applicable(&line.size),
            edition: or_not_applicable(&line.edition),
            custom_name: text(&line.customization.name),
            custom_number: text(&line.customization.number),
            font_type: text(&line.customization.font),
            badge: text(&line.customization.badge),
            price: line.unit_price.amount,
        }
    }
}

fn or_not_applicable(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        "N/A".to_string()
    } else {
        label.to_string()
    }
}

/// Delivery block of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub location: String,
    pub region: String,
}

impl From<&DeliveryDetails> for ShippingDetails {
    fn from(details: &DeliveryDetails) -> Self {
        Self {
            name: details.name.clone(),
            phone: details.phone.as_str().to_string(),
            location: details.location.clone(),
            region: details.region.label().to_string(),
        }
    }
}

/// Backend acknowledgement of a placed order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderPlaced {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

/// Order row in the admin listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
}

/// Ordered product as reported back by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderedItem {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub total_item_price: Option<Decimal>,
}

/// Full order for the admin detail view.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub summary: OrderSummary,
    #[serde(default)]
    pub items: Vec<OrderedItem>,
    /// Printing details, passed through as the backend reports them.
    #[serde(default)]
    pub customization: serde_json::Value,
}

// =============================================================================
// Accounts
// =============================================================================

/// Login form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    /// Username or email.
    pub identifier: String,
    pub password: String,
}

/// Signup and admin registration form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: ApiUser,
}

/// Plain `{"message": ...}` acknowledgement.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Admin
// =============================================================================

/// New category.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewCategory {
    pub name: String,
}

/// New product with its variants.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category_id: CategoryId,
    pub variants: Vec<NewVariant>,
    #[serde(rename = "imageUrl", alias = "image_url", default)]
    pub image_url: String,
}

/// Variant of a new product.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewVariant {
    pub size: String,
    pub edition: String,
    pub stock: i64,
}

/// Errors from validating a new product.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("product name is required")]
    MissingName,
    #[error("price must be greater than zero")]
    InvalidPrice,
    #[error("at least one variant is required")]
    NoVariants,
    #[error("variant {index}: {field} is required")]
    MissingVariantField { index: usize, field: &'static str },
    #[error("variant {index}: stock cannot be negative")]
    NegativeStock { index: usize },
}

impl NewProduct {
    /// Check the product before it is sent to the backend, trimming text
    /// fields in place.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&mut self) -> Result<(), ProductValidationError> {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        if self.name.is_empty() {
            return Err(ProductValidationError::MissingName);
        }
        if self.price <= Decimal::ZERO {
            return Err(ProductValidationError::InvalidPrice);
        }
        if self.variants.is_empty() {
            return Err(ProductValidationError::NoVariants);
        }
        for (index, variant) in self.variants.iter_mut().enumerate() {
            variant.size = variant.size.trim().to_string();
            variant.edition = variant.edition.trim().to_string();
            if variant.size.is_empty() {
                return Err(ProductValidationError::MissingVariantField { index, field: "size" });
            }
            if variant.edition.is_empty() {
                return Err(ProductValidationError::MissingVariantField {
                    index,
                    field: "edition",
                });
            }
            if variant.stock < 0 {
                return Err(ProductValidationError::NegativeStock { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use jersey_house_core::{Customization, DeliveryForm, Price, ShippingRegion};

    use super::*;

    fn product_json() -> &'static str {
        r#"{
            "id": 4,
            "name": "Gor Mahia Home",
            "description": "2024/25 home shirt",
            "price": 2500,
            "image_url": "https://cdn.example/gor.jpg",
            "category": {"id": 1, "name": "Jerseys"},
            "variants": [
                {"size": "M", "edition": "Fan Edition", "stock": 3},
                {"size": "L", "edition": "Fan Edition", "stock": 0},
                {"size": "M", "edition": "Player Edition", "stock": 2}
            ]
        }"#
    }

    #[test]
    fn test_product_derived_fields() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        assert_eq!(product.sizes(), ["M", "L"]);
        assert_eq!(product.total_stock(), 5);
        assert!(product.in_stock());
        assert!(product.is_jersey());
        assert_eq!(product.price, Decimal::new(2500, 0));
    }

    #[test]
    fn test_offers_listed_kit_sizes_only() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        assert!(product.offers_size(KitSize::Medium));
        assert!(product.offers_size(KitSize::Large));
        assert!(!product.offers_size(KitSize::ExtraLarge));
    }

    #[test]
    fn test_offers_size_ignores_case() {
        let mut product: Product = serde_json::from_str(product_json()).unwrap();
        product.variants.truncate(1);
        product.variants[0].size = "xl".to_owned();
        assert!(product.offers_size(KitSize::ExtraLarge));
        assert!(!product.offers_size(KitSize::Medium));
    }

    #[test]
    fn test_free_text_sizes_take_any_size() {
        let mut product: Product = serde_json::from_str(product_json()).unwrap();
        for variant in &mut product.variants {
            variant.size = "One Size".to_owned();
        }
        assert!(product.offers_size(KitSize::Small));
        assert!(product.offers_size(KitSize::TripleExtraLarge));

        product.variants.clear();
        assert!(product.offers_size(KitSize::Large));
    }

    #[test]
    fn test_sold_out_product() {
        let mut product: Product = serde_json::from_str(product_json()).unwrap();
        for variant in &mut product.variants {
            variant.stock = 0;
        }
        assert!(!product.in_stock());
    }

    #[test]
    fn test_category_accepts_both_shapes() {
        let listed: Category =
            serde_json::from_str(r#"{"category_id": 2, "category_name": "Boots", "count": 7}"#)
                .unwrap();
        let plain: Category = serde_json::from_str(r#"{"id": 2, "name": "Boots"}"#).unwrap();
        assert_eq!(listed.category_name, plain.category_name);
        assert_eq!(listed.count, Some(7));
        assert_eq!(plain.count, None);
    }

    #[test]
    fn test_order_request_wire_format() {
        let line = LineItem {
            product_id: ProductId::new(4),
            name: "Gor Mahia Home".to_string(),
            unit_price: Price::kes(Decimal::new(2500, 0)),
            quantity: 2,
            size: "M".to_string(),
            edition: String::new(),
            customization: Customization::new(Some("OLUNGA".to_string()), None, None, None),
            image_url: String::new(),
        };
        let delivery = DeliveryDetails::try_from(DeliveryForm {
            name: "Achieng".to_string(),
            phone: "+254 712 345 678".to_string(),
            location: "Moi Avenue".to_string(),
            region: "Nairobi CBD".to_string(),
            email: None,
        })
        .unwrap();
        let quote = OrderQuote::new(Price::kes(Decimal::new(5400, 0)), ShippingRegion::NairobiCbd);

        let request = OrderRequest::new(&[line], &delivery, &quote);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["total_price"], 5450.0);
        let item = &json["cart"][0];
        assert_eq!(item["product_id"], 4);
        assert_eq!(item["edition"], "N/A");
        assert_eq!(item["customName"], "OLUNGA");
        assert_eq!(item["customNumber"], "");
        assert_eq!(item["badge"], "");
        assert_eq!(item["price"], 2500.0);
        assert_eq!(json["shipping_details"]["phone"], "254712345678");
        assert_eq!(json["shipping_details"]["region"], "Nairobi CBD");
    }

    #[test]
    fn test_new_product_validation() {
        let mut product = NewProduct {
            name: "  Scarf ".to_string(),
            description: String::new(),
            price: Decimal::new(800, 0),
            category_id: CategoryId::new(3),
            variants: vec![NewVariant {
                size: "One Size".to_string(),
                edition: "Fan Edition".to_string(),
                stock: 10,
            }],
            image_url: String::new(),
        };
        assert_eq!(product.validate(), Ok(()));
        assert_eq!(product.name, "Scarf");

        product.price = Decimal::ZERO;
        assert_eq!(product.validate(), Err(ProductValidationError::InvalidPrice));

        product.price = Decimal::ONE;
        product.variants[0].stock = -1;
        assert_eq!(
            product.validate(),
            Err(ProductValidationError::NegativeStock { index: 0 })
        );

        product.variants[0].edition = " ".to_string();
        assert_eq!(
            product.validate(),
            Err(ProductValidationError::MissingVariantField {
                index: 0,
                field: "edition"
            })
        );

        product.variants.clear();
        assert_eq!(product.validate(), Err(ProductValidationError::NoVariants));
    }
}
