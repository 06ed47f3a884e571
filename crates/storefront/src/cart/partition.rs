//! Per-device partitioning of cart storage.
//!
//! A browser's local storage is private to that browser. The storefront
//! keeps carts on the server, so it gives each browser a random device id
//! (held in its session) and prefixes every storage key with it.

use core::fmt;
use core::str::FromStr;

use jersey_house_core::{CartStorage, StorageError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between the device id and the cart key.
const SEPARATOR: char = '.';

/// Random identifier of one browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Generate a fresh device id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for DeviceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A view of a storage backend restricted to one device's keys.
#[derive(Debug, Clone)]
pub struct ScopedStorage<S> {
    inner: S,
    device: DeviceId,
}

impl<S: CartStorage> ScopedStorage<S> {
    /// Scope `inner` to `device`.
    #[must_use]
    pub const fn new(inner: S, device: DeviceId) -> Self {
        Self { inner, device }
    }

    /// The device this view belongs to.
    #[must_use]
    pub const fn device(&self) -> DeviceId {
        self.device
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{SEPARATOR}{key}", self.device)
    }
}

impl<S: CartStorage> CartStorage for ScopedStorage<S> {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(&self.scoped(key))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.store(&self.scoped(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(&self.scoped(key))
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}{SEPARATOR}", self.device);
        Ok(self
            .inner
            .keys()?
            .into_iter()
            .filter_map(|key| key.strip_prefix(&prefix).map(String::from))
            .collect())
    }
}

/// Split a raw storage key into its device and cart key.
#[must_use]
pub fn split_key(raw: &str) -> Option<(DeviceId, &str)> {
    let (device, key) = raw.split_once(SEPARATOR)?;
    Some((device.parse().ok()?, key))
}
