//! Jersey House Core - Shared types and the session cart store.
//!
//! This crate provides the domain used across all Jersey House components:
//! - `storefront` - Backend-for-frontend serving the shop and admin console
//! - `cli` - Command-line tools for inspecting carts and the catalog
//!
//! # Architecture
//!
//! The core crate contains types, traits and pure logic - no network access and
//! no filesystem access. Persistence goes through the [`cart::CartStorage`]
//! trait; the only backend defined here is the in-memory one.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, contact details and kit options
//! - [`cart`] - Line items, customization charges and the session cart store
//! - [`checkout`] - Shipping regions, delivery details and order quotes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod types;

pub use cart::{
    CartError, CartKey, CartStorage, ChargeSchedule, Customization, LineId, LineItem, LineKey,
    MemoryStorage, SessionCart, StorageError,
};
pub use checkout::{
    DeliveryDetails, DeliveryError, DeliveryForm, OrderQuote, PACKAGING_FEE, ShippingRegion,
};
pub use types::*;
