//! Line items and their identity.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{Price, ProductId};

/// Optional personalization printed or stitched onto a jersey.
///
/// Blank strings are treated as "not chosen"; use [`Customization::new`] or
/// [`Customization::normalized`] so that `Some("")` never leaks into a line
/// key or a charge calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customization {
    /// Printed name on the back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Printed number on the back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Lettering style for name and number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Sleeve badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl Customization {
    /// Build a customization, dropping blank values.
    #[must_use]
    pub fn new(
        name: Option<String>,
        number: Option<String>,
        font: Option<String>,
        badge: Option<String>,
    ) -> Self {
        Self {
            name,
            number,
            font,
            badge,
        }
        .normalized()
    }

    /// Trim every field and turn blank values into `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: non_blank(self.name),
            number: non_blank(self.number),
            font: non_blank(self.font),
            badge: non_blank(self.badge),
        }
    }

    /// Whether nothing was chosen.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.number.is_none() && self.font.is_none() && self.badge.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One product configuration and its quantity inside a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Base price of one unit, without customization charges.
    pub unit_price: Price,
    /// Number of units; always at least 1 inside a cart.
    pub quantity: u32,
    /// Size label, e.g. `XL`.
    pub size: String,
    /// Edition label, e.g. `Fan Edition`.
    pub edition: String,
    /// Personalization.
    #[serde(default)]
    pub customization: Customization,
    /// Product image.
    #[serde(default)]
    pub image_url: String,
}

impl LineItem {
    /// The identity used to merge repeated adds of the same configuration.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product_id,
            size: self.size.clone(),
            edition: self.edition.clone(),
            customization: self.customization.clone(),
        }
    }

    /// Stable identifier for addressing this line.
    #[must_use]
    pub fn id(&self) -> LineId {
        self.key().line_id()
    }
}

/// Merge identity of a line: the full product configuration.
///
/// Two adds land on the same line only when product, size, edition and every
/// customization field match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Catalog product.
    pub product_id: ProductId,
    /// Size label.
    pub size: String,
    /// Edition label.
    pub edition: String,
    /// Personalization.
    pub customization: Customization,
}

impl LineKey {
    /// Derive the line's stable id: the first 64 bits of a SHA-256 over the
    /// canonical JSON encoding of the key, as lowercase hex.
    #[must_use]
    pub fn line_id(&self) -> LineId {
        let canonical = serde_json::json!([
            self.product_id,
            self.size,
            self.edition,
            self.customization.name,
            self.customization.number,
            self.customization.font,
            self.customization.badge,
        ]);
        let digest = Sha256::digest(canonical.to_string().as_bytes());
        LineId(hex::encode(digest.get(..LineId::LEN / 2).unwrap_or_default()))
    }
}

/// Stable, opaque identifier of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    /// Length of an id in hex characters.
    pub const LEN: usize = 16;

    /// Wrap an id received from a client.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_ascii_lowercase())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn jersey(name: Option<&str>) -> LineItem {
        LineItem {
            product_id: ProductId::new(3),
            name: "Home Kit 24/25".to_string(),
            unit_price: Price::kes(Decimal::new(2500, 0)),
            quantity: 1,
            size: "L".to_string(),
            edition: "Fan Edition".to_string(),
            customization: Customization::new(name.map(String::from), None, None, None),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_customization_drops_blank_values() {
        let c = Customization::new(
            Some("  ".to_string()),
            Some(" 10 ".to_string()),
            Some(String::new()),
            None,
        );
        assert_eq!(c.name, None);
        assert_eq!(c.number.as_deref(), Some("10"));
        assert_eq!(c.font, None);
        assert!(!c.is_empty());
        assert!(Customization::default().is_empty());
    }

    #[test]
    fn test_line_id_is_stable_and_hex() {
        let a = jersey(Some("SAKA")).id();
        let b = jersey(Some("SAKA")).id();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), LineId::LEN);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_line_id_is_digest_prefix_of_canonical_key() {
        // sha256(r#"[3,"L","Fan Edition",null,null,null,null]"#), first 8 bytes
        assert_eq!(jersey(None).id().as_str(), "a9b6676904490de5");
    }

    #[test]
    fn test_line_id_changes_with_customization() {
        assert_ne!(jersey(Some("SAKA")).id(), jersey(Some("ODEGAARD")).id());
        assert_ne!(jersey(Some("SAKA")).id(), jersey(None).id());
    }

    #[test]
    fn test_line_id_ignores_name_and_price() {
        let mut renamed = jersey(None);
        renamed.name = "Renamed".to_string();
        renamed.unit_price = Price::kes(Decimal::new(1, 0));
        renamed.quantity = 7;
        assert_eq!(renamed.id(), jersey(None).id());
    }

    #[test]
    fn test_line_id_new_normalizes_case() {
        assert_eq!(LineId::new(" ABCdef ").as_str(), "abcdef");
    }
}
