//! The session cart store.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::codec;
use super::{CartError, CartKey, CartStorage, ChargeSchedule, LineId, LineItem};
use crate::types::{CurrencyCode, Price};

/// The line items of one session or user, mirrored to durable storage.
///
/// The store is restored from storage when opened and rewritten after every
/// successful mutation. A mutation is applied to a copy first and only
/// committed once the write succeeds, so a storage failure leaves both the
/// store and the persisted payload unchanged.
///
/// # Example
///
/// ```rust
/// use jersey_house_core::{CartKey, Customization, LineItem, MemoryStorage, Price, ProductId, SessionCart};
/// use rust_decimal::Decimal;
///
/// let storage = MemoryStorage::new();
/// let mut cart = SessionCart::open(&storage, CartKey::Guest)?;
/// let line = cart.add(LineItem {
///     product_id: ProductId::new(1),
///     name: "Home Kit".to_string(),
///     unit_price: Price::kes(Decimal::new(2500, 0)),
///     quantity: 2,
///     size: "M".to_string(),
///     edition: "Fan Edition".to_string(),
///     customization: Customization::default(),
///     image_url: String::new(),
/// })?;
/// assert_eq!(cart.item_count(), 2);
///
/// cart.update_quantity(&line, 0)?;
/// assert!(cart.is_empty());
/// # Ok::<(), jersey_house_core::CartError>(())
/// ```
#[derive(Debug)]
pub struct SessionCart<S> {
    storage: S,
    key: CartKey,
    schedule: ChargeSchedule,
    lines: Vec<LineItem>,
}

impl<S: CartStorage> SessionCart<S> {
    /// Restore the cart stored under `key` with the default charge schedule.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend cannot be read. A stored
    /// payload that fails to decode is logged and replaced by an empty cart.
    pub fn open(storage: S, key: CartKey) -> Result<Self, CartError> {
        Self::open_with(storage, key, ChargeSchedule::default())
    }

    /// Restore the cart stored under `key` with a custom charge schedule.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend cannot be read.
    pub fn open_with(storage: S, key: CartKey, schedule: ChargeSchedule) -> Result<Self, CartError> {
        let storage_key = key.storage_key();
        let restored = match storage.load(&storage_key)? {
            None => Vec::new(),
            Some(payload) => codec::decode(&payload).unwrap_or_else(|error| {
                warn!(
                    cart = %storage_key,
                    error = %error,
                    "Discarding unreadable stored cart"
                );
                Vec::new()
            }),
        };

        // Re-merge so that payloads written under an older identity rule
        // still hold one line per configuration.
        let mut lines: Vec<LineItem> = Vec::with_capacity(restored.len());
        for item in restored {
            merge_into(&mut lines, item);
        }

        debug!(cart = %storage_key, lines = lines.len(), "Cart restored");

        Ok(Self {
            storage,
            key,
            schedule,
            lines,
        })
    }

    /// Which cart this is.
    #[must_use]
    pub const fn key(&self) -> CartKey {
        self.key
    }

    /// The charge schedule used for totals.
    #[must_use]
    pub const fn schedule(&self) -> &ChargeSchedule {
        &self.schedule
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Look up a line by id.
    #[must_use]
    pub fn line(&self, id: &LineId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.id() == *id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Currency of the cart: that of its first line, KES when empty.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.lines
            .first()
            .map_or_else(CurrencyCode::default, |line| line.unit_price.currency_code)
    }

    /// Per-unit customization surcharge of a line.
    #[must_use]
    pub fn customization_charge(&self, line: &LineItem) -> Decimal {
        self.schedule.charge_for(&line.customization)
    }

    /// Price of one unit of a line including customization.
    #[must_use]
    pub fn unit_total(&self, line: &LineItem) -> Price {
        line.unit_price.plus(self.customization_charge(line))
    }

    /// Price of a whole line: unit total times quantity.
    #[must_use]
    pub fn line_total(&self, line: &LineItem) -> Price {
        self.unit_total(line).times(line.quantity)
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let amount = self
            .lines
            .iter()
            .map(|line| self.line_total(line).amount)
            .sum::<Decimal>();
        Price::new(amount, self.currency())
    }

    /// Add an item, merging it into an existing line with the same
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] for a zero quantity,
    /// [`CartError::CurrencyMismatch`] when the item is priced in a different
    /// currency than the cart, or [`CartError::Storage`] if persisting fails.
    pub fn add(&mut self, mut item: LineItem) -> Result<LineId, CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        self.check_currency(&item)?;

        item.customization = item.customization.normalized();
        let id = item.id();
        let product_id = item.product_id;
        let quantity = item.quantity;

        self.commit(|lines| {
            merge_into(lines, item);
            Ok(())
        })?;

        info!(
            cart = %self.key,
            product_id = %product_id,
            line = %id,
            quantity,
            "Added to cart"
        );
        Ok(id)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has that id, or
    /// [`CartError::Storage`] if persisting fails.
    pub fn remove(&mut self, id: &LineId) -> Result<LineItem, CartError> {
        let removed = self.commit(|lines| {
            let index = position(lines, id)?;
            Ok(lines.remove(index))
        })?;

        info!(cart = %self.key, line = %id, product_id = %removed.product_id, "Removed from cart");
        Ok(removed)
    }

    /// Set a line's quantity. Setting it to zero removes the line.
    ///
    /// Returns the updated line, or `None` if it was removed.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has that id, or
    /// [`CartError::Storage`] if persisting fails.
    pub fn update_quantity(
        &mut self,
        id: &LineId,
        quantity: u32,
    ) -> Result<Option<&LineItem>, CartError> {
        let index = self.commit(|lines| {
            let index = position(lines, id)?;
            if quantity == 0 {
                lines.remove(index);
                Ok(None)
            } else {
                if let Some(line) = lines.get_mut(index) {
                    line.quantity = quantity;
                }
                Ok(Some(index))
            }
        })?;

        debug!(cart = %self.key, line = %id, quantity, "Quantity updated");
        Ok(index.and_then(|i| self.lines.get(i)))
    }

    /// Change a line's quantity by `delta`, as the +/- controls do.
    /// The result is clamped at zero, which removes the line.
    ///
    /// # Errors
    ///
    /// Same as [`SessionCart::update_quantity`].
    pub fn adjust_quantity(
        &mut self,
        id: &LineId,
        delta: i64,
    ) -> Result<Option<&LineItem>, CartError> {
        let current = self
            .line(id)
            .map(|line| line.quantity)
            .ok_or_else(|| CartError::LineNotFound(id.clone()))?;
        let target = (i64::from(current) + delta).clamp(0, i64::from(u32::MAX));
        let target = u32::try_from(target).unwrap_or(u32::MAX);
        self.update_quantity(id, target)
    }

    /// Remove every line. The empty cart is still written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if persisting fails.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(|lines| {
            lines.clear();
            Ok(())
        })?;
        info!(cart = %self.key, "Cart cleared");
        Ok(())
    }

    /// Merge another cart's lines into this one, persisting once.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the items are not all priced
    /// in the cart's currency (or, for an empty cart, in the first item's),
    /// or [`CartError::Storage`] if persisting fails. Nothing is merged on
    /// error.
    pub fn absorb(&mut self, items: Vec<LineItem>) -> Result<(), CartError> {
        let Some(first) = items.first() else {
            return Ok(());
        };
        let expected = if self.lines.is_empty() {
            first.unit_price.currency_code
        } else {
            self.currency()
        };
        if let Some(item) = items
            .iter()
            .find(|item| item.unit_price.currency_code != expected)
        {
            return Err(CartError::CurrencyMismatch {
                expected,
                found: item.unit_price.currency_code,
            });
        }

        let count = items.len();
        self.commit(|lines| {
            for mut item in items.into_iter().filter(|item| item.quantity > 0) {
                item.customization = item.customization.normalized();
                merge_into(lines, item);
            }
            Ok(())
        })?;

        info!(cart = %self.key, absorbed = count, "Merged lines into cart");
        Ok(())
    }

    /// Empty the cart and delete its stored entry, returning the lines it
    /// held.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the entry cannot be deleted.
    pub fn discard(&mut self) -> Result<Vec<LineItem>, CartError> {
        self.storage.remove(&self.key.storage_key())?;
        debug!(cart = %self.key, "Stored cart deleted");
        Ok(std::mem::take(&mut self.lines))
    }

    fn check_currency(&self, item: &LineItem) -> Result<(), CartError> {
        let expected = self.currency();
        let found = item.unit_price.currency_code;
        if self.lines.is_empty() || expected == found {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch { expected, found })
        }
    }

    /// Apply `mutate` to a copy of the lines, persist the copy, then commit.
    fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<LineItem>) -> Result<T, CartError>,
    ) -> Result<T, CartError> {
        let mut next = self.lines.clone();
        let result = mutate(&mut next)?;

        let payload = codec::encode(&next).map_err(CartError::Encode)?;
        self.storage.store(&self.key.storage_key(), &payload)?;

        self.lines = next;
        Ok(result)
    }
}

fn position(lines: &[LineItem], id: &LineId) -> Result<usize, CartError> {
    lines
        .iter()
        .position(|line| line.id() == *id)
        .ok_or_else(|| CartError::LineNotFound(id.clone()))
}

/// Merge `item` into `lines`: bump the quantity of a line with the same key
/// (refreshing its descriptive fields) or append a new line.
fn merge_into(lines: &mut Vec<LineItem>, item: LineItem) {
    let key = item.key();
    match lines.iter_mut().find(|line| line.key() == key) {
        Some(existing) => {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            existing.name = item.name;
            existing.unit_price = item.unit_price;
            if !item.image_url.is_empty() {
                existing.image_url = item.image_url;
            }
        }
        None => lines.push(item),
    }
}
