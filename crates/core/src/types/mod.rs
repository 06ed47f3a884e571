//! Core types for Jersey House.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod kit;
pub mod price;

pub use contact::{Email, EmailError, PhoneError, PhoneNumber};
pub use id::*;
pub use kit::{Badge, FontType, KitEdition, KitSize, SelectionError};
pub use price::{CurrencyCode, Price};
