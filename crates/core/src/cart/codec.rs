//! Versioned serialization boundary for persisted carts.
//!
//! # Formats
//!
//! Version 2 (current) is an envelope:
//!
//! ```json
//! {"version": 2, "items": [{"product_id": 3, "name": "...", "unit_price": {...}, ...}]}
//! ```
//!
//! Version 1 is the bare array the browser app used to write, with camelCase
//! customization fields and a numeric price:
//!
//! ```json
//! [{"id": 3, "name": "...", "price": 2500, "quantity": 1, "size": "L",
//!   "edition": "Fan Edition", "customName": "SAKA", "image_url": "..."}]
//! ```
//!
//! Version 1 may also arrive wrapped in an envelope with `"version": 1`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Customization, LineItem};
use crate::types::{Price, ProductId};

/// Version written by [`encode`].
pub const CURRENT_VERSION: u64 = 2;

/// Label used when a legacy record carries no size or edition.
const NOT_APPLICABLE: &str = "N/A";

/// Errors from decoding a persisted cart.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not valid JSON or does not have the expected shape.
    #[error("malformed cart payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but neither an array nor a versioned envelope.
    #[error("cart payload is neither a list nor a versioned envelope")]
    UnknownShape,

    /// The envelope was written by a newer (or unknown) version.
    #[error("unsupported cart payload version {0}")]
    UnsupportedVersion(u64),

    /// A legacy record has a price that is not a decimal number.
    #[error("invalid price in legacy cart record: {0}")]
    InvalidPrice(String),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u64,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
struct Envelope {
    version: u64,
    #[serde(default)]
    items: Value,
}

/// Cart record as written by the browser app.
#[derive(Deserialize)]
struct LegacyLineItem {
    id: ProductId,
    #[serde(default)]
    name: String,
    price: serde_json::Number,
    #[serde(default)]
    quantity: Option<serde_json::Number>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    edition: Option<String>,
    #[serde(default)]
    badge: Option<Value>,
    #[serde(default, rename = "customName")]
    custom_name: Option<Value>,
    #[serde(default, rename = "customNumber")]
    custom_number: Option<Value>,
    #[serde(default, rename = "fontType")]
    font_type: Option<Value>,
    #[serde(default)]
    image_url: Option<String>,
}

/// Encode cart lines as a current-version envelope.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn encode(items: &[LineItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeRef {
        version: CURRENT_VERSION,
        items,
    })
}

/// Decode a persisted cart of any supported version.
///
/// Lines with a zero quantity are dropped and customizations are normalized,
/// so the result always satisfies the cart's invariants.
///
/// # Errors
///
/// Returns [`CodecError`] if the payload is malformed, has an unknown version,
/// or a legacy record carries an unreadable price.
pub fn decode(payload: &str) -> Result<Vec<LineItem>, CodecError> {
    let value: Value = serde_json::from_str(payload)?;

    let items = match value {
        Value::Array(_) => decode_legacy(value)?,
        Value::Object(_) => {
            let envelope: Envelope = serde_json::from_value(value)?;
            let items = if envelope.items.is_null() {
                Value::Array(Vec::new())
            } else {
                envelope.items
            };
            match envelope.version {
                1 => decode_legacy(items)?,
                CURRENT_VERSION => serde_json::from_value::<Vec<LineItem>>(items)?,
                other => return Err(CodecError::UnsupportedVersion(other)),
            }
        }
        _ => return Err(CodecError::UnknownShape),
    };

    Ok(items
        .into_iter()
        .filter(|item| item.quantity > 0)
        .map(|mut item| {
            item.customization = item.customization.normalized();
            item
        })
        .collect())
}

fn decode_legacy(value: Value) -> Result<Vec<LineItem>, CodecError> {
    let records: Vec<LegacyLineItem> = serde_json::from_value(value)?;
    records.into_iter().map(migrate_legacy).collect()
}

fn migrate_legacy(record: LegacyLineItem) -> Result<LineItem, CodecError> {
    let raw_price = record.price.to_string();
    let amount = Decimal::from_str(&raw_price)
        .or_else(|_| Decimal::from_scientific(&raw_price))
        .map_err(|_| CodecError::InvalidPrice(raw_price.clone()))?;

    // Quantities that went negative in the old app are treated as removed.
    let quantity = record
        .quantity
        .as_ref()
        .map_or(Some(1), serde_json::Number::as_u64)
        .map_or(0, |q| u32::try_from(q).unwrap_or(u32::MAX));

    Ok(LineItem {
        product_id: record.id,
        name: record.name,
        unit_price: Price::kes(amount),
        quantity,
        size: label_or_na(record.size),
        edition: label_or_na(record.edition),
        customization: Customization::new(
            legacy_text(record.custom_name),
            legacy_text(record.custom_number),
            legacy_text(record.font_type),
            legacy_text(record.badge),
        ),
        image_url: record.image_url.unwrap_or_default(),
    })
}

fn label_or_na(label: Option<String>) -> String {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// Legacy text inputs could hold strings, numbers (jersey numbers) or null.
fn legacy_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn line(quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(11),
            name: "Away Kit".to_string(),
            unit_price: Price::kes(Decimal::new(3000, 0)),
            quantity,
            size: "M".to_string(),
            edition: "Player Edition".to_string(),
            customization: Customization::new(
                Some("MESSI".to_string()),
                Some("10".to_string()),
                None,
                None,
            ),
            image_url: "https://cdn.example/away.jpg".to_string(),
        }
    }

    #[test]
    fn test_encode_writes_envelope() {
        let encoded = encode(&[line(2)]).unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["version"], 2);
        assert_eq!(value["items"][0]["quantity"], 2);
        assert_eq!(value["items"][0]["customization"]["name"], "MESSI");
    }

    #[test]
    fn test_current_version_decodes() {
        let items = vec![line(2), line(1)];
        let decoded = decode(&encode(&items).unwrap()).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_empty_envelope() {
        assert!(decode(&encode(&[]).unwrap()).unwrap().is_empty());
        assert!(decode(r#"{"version": 2}"#).unwrap().is_empty());
    }

    #[test]
    fn test_legacy_array_migrates() {
        let payload = r#"[{
            "id": 5,
            "name": "Home Kit",
            "price": 2500.5,
            "quantity": 3,
            "size": "XL",
            "edition": "Fan Edition",
            "badge": "",
            "customName": "OKOCHA",
            "customNumber": 10,
            "fontType": "",
            "image_url": "https://cdn.example/home.jpg"
        }]"#;

        let items = decode(payload).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.product_id, ProductId::new(5));
        assert_eq!(item.unit_price, Price::kes(Decimal::new(25005, 1)));
        assert_eq!(item.quantity, 3);
        assert_eq!(item.size, "XL");
        assert_eq!(item.customization.name.as_deref(), Some("OKOCHA"));
        assert_eq!(item.customization.number.as_deref(), Some("10"));
        assert_eq!(item.customization.badge, None);
        assert_eq!(item.customization.font, None);
        assert_eq!(item.image_url, "https://cdn.example/home.jpg");
    }

    #[test]
    fn test_legacy_drops_non_positive_quantities_and_defaults_labels() {
        let payload = r#"[
            {"id": 1, "name": "Scarf", "price": 800, "quantity": 0},
            {"id": 2, "name": "Cap", "price": 900, "quantity": -1},
            {"id": 3, "name": "Ball", "price": 1200}
        ]"#;

        let items = decode(payload).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, ProductId::new(3));
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].size, "N/A");
        assert_eq!(items[0].edition, "N/A");
    }

    #[test]
    fn test_version_one_envelope() {
        let payload = r#"{"version": 1, "items": [{"id": 8, "price": 100, "quantity": 2}]}"#;
        let items = decode(payload).unwrap();
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_rejects_unknown_version() {
        let err = decode(r#"{"version": 9, "items": []}"#).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(CodecError::Json(_))));
        assert!(matches!(decode("42"), Err(CodecError::UnknownShape)));
        assert!(matches!(
            decode(r#"[{"name": "no id"}]"#),
            Err(CodecError::Json(_))
        ));
    }
}
