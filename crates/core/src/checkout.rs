//! Delivery details, shipping regions and order quotes.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{CartStorage, SessionCart};
use crate::types::{Email, EmailError, PhoneError, PhoneNumber, Price};

/// Flat packaging fee added to every order, in KES.
pub const PACKAGING_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Delivery area chosen at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingRegion {
    #[serde(rename = "Nairobi CBD")]
    NairobiCbd,
    #[serde(rename = "Public Means")]
    PublicMeans,
    #[serde(rename = "ZONE 1")]
    Zone1,
    #[serde(rename = "ZONE 2")]
    Zone2,
    #[serde(rename = "ZONE 3")]
    Zone3,
    #[serde(rename = "ZONE 4")]
    Zone4,
    #[serde(rename = "ZONE 5")]
    Zone5,
    #[serde(rename = "ZONE 6")]
    Zone6,
    #[serde(rename = "ZONE 7")]
    Zone7,
    #[serde(rename = "ZONE 8")]
    Zone8,
    #[serde(rename = "ZONE 9")]
    Zone9,
    #[serde(rename = "ZONE 10")]
    Zone10,
    #[serde(rename = "ZONE 11")]
    Zone11,
}

impl ShippingRegion {
    /// Every region, in the order the checkout form lists them.
    pub const ALL: &'static [Self] = &[
        Self::NairobiCbd,
        Self::PublicMeans,
        Self::Zone1,
        Self::Zone2,
        Self::Zone3,
        Self::Zone4,
        Self::Zone5,
        Self::Zone6,
        Self::Zone7,
        Self::Zone8,
        Self::Zone9,
        Self::Zone10,
        Self::Zone11,
    ];

    /// The label sent to the backend.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NairobiCbd => "Nairobi CBD",
            Self::PublicMeans => "Public Means",
            Self::Zone1 => "ZONE 1",
            Self::Zone2 => "ZONE 2",
            Self::Zone3 => "ZONE 3",
            Self::Zone4 => "ZONE 4",
            Self::Zone5 => "ZONE 5",
            Self::Zone6 => "ZONE 6",
            Self::Zone7 => "ZONE 7",
            Self::Zone8 => "ZONE 8",
            Self::Zone9 => "ZONE 9",
            Self::Zone10 => "ZONE 10",
            Self::Zone11 => "ZONE 11",
        }
    }

    /// Delivery fee in KES.
    #[must_use]
    pub fn fee(&self) -> Decimal {
        let shillings = match self {
            Self::NairobiCbd => 0,
            Self::PublicMeans | Self::Zone1 | Self::Zone2 | Self::Zone3 => 300,
            Self::Zone4 => 700,
            Self::Zone6 => 800,
            Self::Zone5
            | Self::Zone7
            | Self::Zone8
            | Self::Zone9
            | Self::Zone10
            | Self::Zone11 => 500,
        };
        Decimal::new(shillings, 0)
    }
}

impl fmt::Display for ShippingRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShippingRegion {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DeliveryError::UnknownRegion(s.to_string()))
    }
}

/// Errors from validating delivery details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// A required field was left blank.
    #[error("{0} is required")]
    Missing(&'static str),

    /// The region is not one we deliver to.
    #[error("unknown shipping region: {0}")]
    UnknownRegion(String),

    #[error(transparent)]
    Phone(#[from] PhoneError),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Delivery form as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeliveryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Validated delivery details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryDetails {
    pub name: String,
    pub phone: PhoneNumber,
    pub location: String,
    pub region: ShippingRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl TryFrom<DeliveryForm> for DeliveryDetails {
    type Error = DeliveryError;

    fn try_from(form: DeliveryForm) -> Result<Self, Self::Error> {
        let name = required(&form.name, "name")?;
        let location = required(&form.location, "location")?;
        let region = required(&form.region, "region")?.parse()?;
        if form.phone.trim().is_empty() {
            return Err(DeliveryError::Missing("phone"));
        }
        let phone = PhoneNumber::parse(&form.phone)?;
        let email = match form.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Email::parse(raw)?),
        };

        Ok(Self {
            name,
            phone,
            location,
            region,
            email,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, DeliveryError> {
    let value = value.trim();
    if value.is_empty() {
        Err(DeliveryError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

/// What the customer pays: items with customization, shipping and packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderQuote {
    pub items: Price,
    pub shipping: Price,
    pub packaging: Price,
    pub total: Price,
}

impl OrderQuote {
    /// Quote an items total for delivery to `region`.
    #[must_use]
    pub fn new(items: Price, region: ShippingRegion) -> Self {
        let currency = items.currency_code;
        let shipping = Price::new(region.fee(), currency);
        let packaging = Price::new(PACKAGING_FEE, currency);
        let total = items.plus(shipping.amount).plus(packaging.amount);
        Self {
            items,
            shipping,
            packaging,
            total,
        }
    }

    /// Quote the current contents of a cart.
    #[must_use]
    pub fn for_cart<S: CartStorage>(cart: &SessionCart<S>, region: ShippingRegion) -> Self {
        Self::new(cart.subtotal(), region)
    }
}
