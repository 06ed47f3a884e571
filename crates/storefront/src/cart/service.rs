//! Access to session carts from async handlers.

use std::collections::HashMap;
use std::sync::{Arc, MutexGuard, PoisonError};

use jersey_house_core::{CartError, CartKey, CartStorage, ChargeSchedule, SessionCart, UserId};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{error, info};

use super::partition::{DeviceId, ScopedStorage};

/// Shared storage backend.
pub type SharedStorage = Arc<dyn CartStorage>;

/// A session cart as seen by one device.
pub type DeviceCart = SessionCart<ScopedStorage<SharedStorage>>;

/// Errors from the cart service.
#[derive(Debug, Error)]
pub enum CartServiceError {
    /// Loading, changing or persisting the cart failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The blocking storage task panicked or was cancelled.
    #[error("cart task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Opens, mutates and persists carts on behalf of request handlers.
///
/// Storage is synchronous, so every cart operation runs on the blocking pool.
/// Mutations are serialized per device so that two requests from the same
/// browser cannot interleave their read-modify-write cycles, while other
/// browsers proceed in parallel.
#[derive(Clone)]
pub struct CartService {
    inner: Arc<CartServiceInner>,
}

struct CartServiceInner {
    storage: SharedStorage,
    schedule: ChargeSchedule,
    locks: DeviceLocks,
}

/// One async lock per device, forgotten once nobody holds or waits on it.
#[derive(Default)]
struct DeviceLocks {
    locks: std::sync::Mutex<HashMap<DeviceId, Arc<Mutex<()>>>>,
}

impl DeviceLocks {
    fn entries(&self) -> MutexGuard<'_, HashMap<DeviceId, Arc<Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn acquire(&self, device: DeviceId) -> DeviceGuard<'_> {
        let lock = Arc::clone(self.entries().entry(device).or_default());
        DeviceGuard {
            locks: self,
            device,
            guard: Some(lock.lock_owned().await),
        }
    }
}

struct DeviceGuard<'a> {
    locks: &'a DeviceLocks,
    device: DeviceId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DeviceGuard<'_> {
    fn drop(&mut self) {
        let mut entries = self.locks.entries();
        drop(self.guard.take());
        // Waiters clone the lock under `entries`, so a lone reference is idle.
        if entries
            .get(&self.device)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            entries.remove(&self.device);
        }
    }
}

impl CartService {
    /// Create a service over `storage` pricing customization with `schedule`.
    #[must_use]
    pub fn new(storage: SharedStorage, schedule: ChargeSchedule) -> Self {
        Self {
            inner: Arc::new(CartServiceInner {
                storage,
                schedule,
                locks: DeviceLocks::default(),
            }),
        }
    }

    /// The customization charges applied to every cart.
    #[must_use]
    pub fn schedule(&self) -> &ChargeSchedule {
        &self.inner.schedule
    }

    fn open(&self, device: DeviceId, key: CartKey) -> Result<DeviceCart, CartError> {
        let storage = ScopedStorage::new(Arc::clone(&self.inner.storage), device);
        SessionCart::open_with(storage, key, self.inner.schedule)
    }

    /// Check that the storage backend can be listed.
    ///
    /// # Errors
    ///
    /// Returns the storage error if it cannot.
    pub async fn ready(&self) -> Result<(), CartServiceError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.inner.storage.keys().map(drop))
            .await?
            .map_err(CartError::from)?;
        Ok(())
    }

    /// Run `read` against the current state of a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn read<T, F>(&self, device: DeviceId, key: CartKey, read: F) -> Result<T, CartServiceError>
    where
        F: FnOnce(&DeviceCart) -> T + Send + 'static,
        T: Send + 'static,
    {
        let service = self.clone();
        let value = tokio::task::spawn_blocking(move || {
            let cart = service.open(device, key)?;
            Ok::<_, CartError>(read(&cart))
        })
        .await??;
        Ok(value)
    }

    /// Run `update` against a cart. Every mutation `update` performs is
    /// persisted before it returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded or `update` fails.
    pub async fn update<T, F>(
        &self,
        device: DeviceId,
        key: CartKey,
        update: F,
    ) -> Result<T, CartServiceError>
    where
        F: FnOnce(&mut DeviceCart) -> Result<T, CartError> + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.inner.locks.acquire(device).await;
        let service = self.clone();
        let value = tokio::task::spawn_blocking(move || {
            let mut cart = service.open(device, key)?;
            update(&mut cart)
        })
        .await??;
        Ok(value)
    }

    /// Move this device's guest cart into a user's cart, as happens on
    /// login. The guest entry is deleted before its lines are merged, so a
    /// guest cart is never merged twice.
    ///
    /// Returns the number of lines moved.
    ///
    /// # Errors
    ///
    /// Returns an error if either cart cannot be loaded or written. Neither
    /// cart changes if the guest entry cannot be deleted, and the guest cart
    /// is written back if the merge fails.
    pub async fn adopt_guest_cart(
        &self,
        device: DeviceId,
        user: UserId,
    ) -> Result<usize, CartServiceError> {
        let _guard = self.inner.locks.acquire(device).await;
        let service = self.clone();
        let moved = tokio::task::spawn_blocking(move || {
            let mut guest = service.open(device, CartKey::Guest)?;
            if guest.is_empty() {
                return Ok::<_, CartError>(0);
            }

            let mut owned = service.open(device, CartKey::User(user))?;
            let lines = guest.discard()?;
            let count = lines.len();
            if let Err(err) = owned.absorb(lines.clone()) {
                if let Err(restore) = guest.absorb(lines) {
                    error!(device = %device, error = %restore, "Failed to restore guest cart");
                }
                return Err(err);
            }
            Ok(count)
        })
        .await??;

        if moved > 0 {
            info!(device = %device, user_id = %user, lines = moved, "Guest cart merged into user cart");
        }
        Ok(moved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use jersey_house_core::{
        CurrencyCode, Customization, LineItem, MemoryStorage, Price, ProductId, StorageError,
    };
    use rust_decimal::Decimal;

    use super::*;

    fn service() -> CartService {
        CartService::new(Arc::new(MemoryStorage::new()), ChargeSchedule::default())
    }

    /// Memory storage whose deletes can be switched off.
    #[derive(Default)]
    struct StickyStorage {
        inner: MemoryStorage,
        refuse_remove: AtomicBool,
    }

    impl CartStorage for StickyStorage {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.load(key)
        }

        fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.inner.store(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            if self.refuse_remove.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("read-only volume")));
            }
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.inner.keys()
        }
    }

    async fn counts(carts: &CartService, device: DeviceId, key: CartKey) -> (usize, u32) {
        carts
            .read(device, key, |cart| (cart.line_count(), cart.item_count()))
            .await
            .unwrap()
    }

    fn jersey(product: i32, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(product),
            name: format!("Kit {product}"),
            unit_price: Price::kes(Decimal::new(2000, 0)),
            quantity,
            size: "M".to_string(),
            edition: "Fan Edition".to_string(),
            customization: Customization::default(),
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_update_then_read() {
        let carts = service();
        let device = DeviceId::random();

        carts
            .update(device, CartKey::Guest, |cart| cart.add(jersey(1, 2)))
            .await
            .unwrap();
        let count = carts
            .read(device, CartKey::Guest, |cart| cart.item_count())
            .await
            .unwrap();
        assert_eq!(count, 2);

        let other = carts
            .read(DeviceId::random(), CartKey::Guest, |cart| cart.item_count())
            .await
            .unwrap();
        assert_eq!(other, 0);
    }

    #[tokio::test]
    async fn test_update_error_is_returned() {
        let carts = service();
        let err = carts
            .update(DeviceId::random(), CartKey::Guest, |cart| cart.add(jersey(1, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, CartServiceError::Cart(CartError::ZeroQuantity)));
    }

    #[tokio::test]
    async fn test_adopt_guest_cart() {
        let carts = service();
        let device = DeviceId::random();
        let user = UserId::new(42);

        carts
            .update(device, CartKey::Guest, |cart| {
                cart.add(jersey(1, 1))?;
                cart.add(jersey(2, 1))
            })
            .await
            .unwrap();
        carts
            .update(device, CartKey::User(user), |cart| cart.add(jersey(1, 3)))
            .await
            .unwrap();

        assert_eq!(carts.adopt_guest_cart(device, user).await.unwrap(), 2);

        let (lines, items) = carts
            .read(device, CartKey::User(user), |cart| {
                (cart.line_count(), cart.item_count())
            })
            .await
            .unwrap();
        assert_eq!((lines, items), (2, 5));
        let guest_empty = carts
            .read(device, CartKey::Guest, |cart| cart.is_empty())
            .await
            .unwrap();
        assert!(guest_empty);

        assert_eq!(carts.adopt_guest_cart(device, user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_guest_delete_leaves_both_carts_alone() {
        let storage = Arc::new(StickyStorage::default());
        let carts = CartService::new(storage.clone(), ChargeSchedule::default());
        let device = DeviceId::random();
        let user = UserId::new(42);

        carts
            .update(device, CartKey::Guest, |cart| cart.add(jersey(1, 2)))
            .await
            .unwrap();
        carts
            .update(device, CartKey::User(user), |cart| cart.add(jersey(1, 1)))
            .await
            .unwrap();

        storage.refuse_remove.store(true, Ordering::SeqCst);
        for _ in 0..2 {
            let err = carts.adopt_guest_cart(device, user).await.unwrap_err();
            assert!(matches!(err, CartServiceError::Cart(CartError::Storage(_))));
        }
        assert_eq!(counts(&carts, device, CartKey::User(user)).await, (1, 1));
        assert_eq!(counts(&carts, device, CartKey::Guest).await, (1, 2));

        storage.refuse_remove.store(false, Ordering::SeqCst);
        assert_eq!(carts.adopt_guest_cart(device, user).await.unwrap(), 1);
        assert_eq!(counts(&carts, device, CartKey::User(user)).await, (1, 3));
        assert_eq!(carts.adopt_guest_cart(device, user).await.unwrap(), 0);
        assert_eq!(counts(&carts, device, CartKey::User(user)).await, (1, 3));
    }

    #[tokio::test]
    async fn test_rejected_merge_restores_guest_cart() {
        let carts = service();
        let device = DeviceId::random();
        let user = UserId::new(42);

        carts
            .update(device, CartKey::Guest, |cart| cart.add(jersey(1, 2)))
            .await
            .unwrap();
        carts
            .update(device, CartKey::User(user), |cart| {
                let mut dollars = jersey(2, 1);
                dollars.unit_price = Price::new(Decimal::new(20, 0), CurrencyCode::USD);
                cart.add(dollars)
            })
            .await
            .unwrap();

        let err = carts.adopt_guest_cart(device, user).await.unwrap_err();
        assert!(matches!(
            err,
            CartServiceError::Cart(CartError::CurrencyMismatch { .. })
        ));
        assert_eq!(counts(&carts, device, CartKey::Guest).await, (1, 2));
        assert_eq!(counts(&carts, device, CartKey::User(user)).await, (1, 1));
    }

    #[tokio::test]
    async fn test_devices_do_not_wait_on_each_other() {
        let carts = service();
        let busy = DeviceId::random();
        let other = DeviceId::random();

        let held = carts.inner.locks.acquire(busy).await;
        tokio::time::timeout(
            Duration::from_secs(5),
            carts.update(other, CartKey::Guest, |cart| cart.add(jersey(1, 1))),
        )
        .await
        .expect("other device blocked by a busy one")
        .unwrap();

        let pending = tokio::spawn({
            let carts = carts.clone();
            async move {
                carts
                    .update(busy, CartKey::Guest, |cart| cart.add(jersey(1, 1)))
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        drop(held);
        pending.await.unwrap().unwrap();
        assert!(carts.inner.locks.entries().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let carts = service();
        let device = DeviceId::random();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let carts = carts.clone();
                tokio::spawn(async move {
                    carts
                        .update(device, CartKey::Guest, |cart| cart.add(jersey(1, 1)))
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let count = carts
            .read(device, CartKey::Guest, |cart| cart.item_count())
            .await
            .unwrap();
        assert_eq!(count, 16);
    }
}
