//! Server-side home of the shop's carts.
//!
//! Carts are [`SessionCart`](jersey_house_core::SessionCart)s persisted to
//! [`FileStorage`], partitioned per browser with [`ScopedStorage`], and
//! reached from handlers through [`CartService`].

mod file_storage;
mod partition;
mod service;

pub use file_storage::FileStorage;
pub use partition::{DeviceId, ScopedStorage, split_key};
pub use service::{CartService, CartServiceError, DeviceCart, SharedStorage};
