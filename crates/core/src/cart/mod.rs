//! The session cart: line items, their identity and pricing, and the store
//! that keeps them in durable storage.
//!
//! A cart is scoped by a [`CartKey`] (a user's cart or the guest cart) and
//! persisted through [`CartStorage`] as a versioned JSON payload (see
//! [`codec`]). Lines merge on their full configuration, so adding the same
//! shirt with the same size, edition and printing twice bumps one line's
//! quantity instead of creating a second line.

mod charges;
pub mod codec;
mod key;
mod line_item;
mod storage;
mod store;

pub use charges::ChargeSchedule;
pub use codec::CodecError;
pub use key::CartKey;
pub use line_item::{Customization, LineId, LineItem, LineKey};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::SessionCart;

use crate::types::CurrencyCode;

/// Errors from cart operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Items must be added with at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// No line in the cart has this id.
    #[error("cart line not found: {0}")]
    LineNotFound(LineId),

    /// The item is priced in a different currency than the cart.
    #[error("cannot mix currencies in one cart: cart is {expected}, item is {found}")]
    CurrencyMismatch {
        /// Currency of the cart's existing lines.
        expected: CurrencyCode,
        /// Currency of the rejected item.
        found: CurrencyCode,
    },

    /// The cart could not be serialized.
    #[error("failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
