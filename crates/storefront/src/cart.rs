//! Cart store.
//!
//! Owns the ordered list of cart lines and keeps it in lockstep with the
//! durable store. Every mutation builds the next list, writes it, and only
//! then swaps it in; if the write fails the in-memory cart is left untouched
//! and the error is returned, so memory and storage never disagree.
//!
//! Invariants held at all times:
//!
//! - at most one line per [`ProductId`], in first-added order
//! - every line has a quantity of at least one

use oud_cart_core::{CartLine, Price, ProductId, ProductRecord};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, StorageError};

/// The session's cart, backed by a [`KeyValueStore`].
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
    lines: Vec<CartLine>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restore the cart stored under `key`.
    ///
    /// Never fails: a missing value, an unreadable store, or a value that is
    /// not a JSON list all yield an empty cart. Individual lines that do not
    /// parse (or carry a quantity below one) are dropped, and lines repeating
    /// an earlier id are folded into the first one.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let lines = match storage.get(&key) {
            Ok(Some(raw)) => parse_lines(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored cart, starting empty");
                Vec::new()
            }
        };

        debug!(key = %key, lines = lines.len(), "Cart loaded");
        Self {
            storage,
            key,
            lines,
        }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities over all lines, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity())).sum()
    }

    /// Add one unit of a product.
    ///
    /// An existing line with the same id gains one unit; otherwise a new line
    /// is appended. The zero id never names a product, so adding it is a
    /// no-op that does not touch storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be persisted; the
    /// cart is then unchanged.
    pub fn add(
        &mut self,
        id: ProductId,
        name: &str,
        unit_price: Price,
        image: &str,
    ) -> Result<(), StorageError> {
        if id.is_unset() {
            debug!("Ignoring add without a product id");
            return Ok(());
        }

        let mut next = self.lines.clone();
        match next.iter_mut().find(|line| line.id() == id) {
            Some(line) => line.increment(),
            None => next.push(CartLine::new(
                id,
                name.to_string(),
                unit_price,
                image.to_string(),
            )),
        }
        self.commit(next)
    }

    /// Add one unit of a catalog product.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be persisted.
    pub fn add_product(&mut self, product: &ProductRecord) -> Result<(), StorageError> {
        self.add(
            product.id,
            &product.name,
            product.unit_price,
            &product.image,
        )
    }

    /// Add one unit of an item that is not in the catalog.
    ///
    /// Manual items are matched by name: a line with the same name gains one
    /// unit. Otherwise the item gets a synthetic id taken from the current
    /// time in milliseconds, bumped until it is unique within the cart.
    /// Returns the id of the line that received the unit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be persisted.
    pub fn add_manual(
        &mut self,
        name: &str,
        unit_price: Price,
        image: &str,
    ) -> Result<ProductId, StorageError> {
        let mut next = self.lines.clone();
        let id = if let Some(line) = next.iter_mut().find(|line| line.name() == name) {
            line.increment();
            line.id()
        } else {
            let id = self.synthetic_id();
            next.push(CartLine::new(
                id,
                name.to_string(),
                unit_price,
                image.to_string(),
            ));
            id
        };
        self.commit(next)?;
        Ok(id)
    }

    /// Move a line's quantity by `delta`, clamping at one.
    ///
    /// This never removes a line; dropping a line at the floor is the
    /// caller's decision. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be persisted.
    pub fn set_quantity(&mut self, id: ProductId, delta: i64) -> Result<(), StorageError> {
        let mut next = self.lines.clone();
        let Some(line) = next.iter_mut().find(|line| line.id() == id) else {
            debug!(%id, "Ignoring quantity change for unknown line");
            return Ok(());
        };
        line.apply_delta(delta);
        self.commit(next)
    }

    /// Delete the line for `id`. Removing an absent id leaves the cart as is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated cart cannot be persisted.
    pub fn remove(&mut self, id: ProductId) -> Result<(), StorageError> {
        let next = self
            .lines
            .iter()
            .filter(|line| line.id() != id)
            .cloned()
            .collect();
        self.commit(next)
    }

    /// Give back the underlying store, e.g. to reopen it in a new session.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, next: Vec<CartLine>) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&next)?;
        self.storage.set(&self.key, &encoded)?;
        self.lines = next;
        debug!(
            lines = self.lines.len(),
            items = self.item_count(),
            "Cart persisted"
        );
        Ok(())
    }

    fn synthetic_id(&self) -> ProductId {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.line(ProductId::new(candidate)).is_some() || candidate == 0 {
            candidate += 1;
        }
        ProductId::new(candidate)
    }
}

fn parse_lines(raw: &str) -> Vec<CartLine> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "Stored cart is not a JSON list, starting empty");
            return Vec::new();
        }
    };

    let mut lines: Vec<CartLine> = Vec::with_capacity(values.len());
    for value in values {
        let line: CartLine = match serde_json::from_value(value) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Dropping malformed stored cart line");
                continue;
            }
        };
        match lines.iter_mut().find(|existing| existing.id() == line.id()) {
            Some(existing) => existing.absorb(line.quantity()),
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const KEY: &str = "cart";

    fn empty_cart() -> CartStore<MemoryStore> {
        CartStore::load(MemoryStore::new(), KEY)
    }

    fn add_units(cart: &mut CartStore<MemoryStore>, id: i64, times: usize) {
        for _ in 0..times {
            cart.add(ProductId::new(id), "X", Price::from_units(50), "x.jpg")
                .unwrap();
        }
    }

    /// A store whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn test_load_missing_value_is_empty() {
        assert!(empty_cart().is_empty());
    }

    #[test]
    fn test_load_malformed_value_is_empty() {
        for raw in ["not json", "{\"id\":1}", "42", "null"] {
            let storage = MemoryStore::new();
            storage.insert_raw(KEY, raw).unwrap();
            assert!(CartStore::load(storage, KEY).is_empty(), "input: {raw}");
        }
    }

    #[test]
    fn test_load_drops_bad_lines_and_merges_duplicates() {
        let storage = MemoryStore::new();
        storage
            .insert_raw(
                KEY,
                r#"[
                    {"id":"1","name":"A","price":10,"img":"","qty":2},
                    {"id":2,"name":"B","price":5,"img":"","qty":0},
                    {"name":"no id"},
                    {"id":1,"name":"A","price":10,"img":"","qty":3}
                ]"#,
            )
            .unwrap();
        let cart = CartStore::load(storage, KEY);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity(), 5);
    }

    #[test]
    fn test_repeated_add_merges_into_one_line() {
        let mut cart = empty_cart();
        add_units(&mut cart, 7, 5);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(ProductId::new(7)).unwrap().quantity(), 5);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = empty_cart();
        add_units(&mut cart, 3, 1);
        add_units(&mut cart, 1, 1);
        add_units(&mut cart, 3, 1);
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.id().as_i64()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_add_zero_id_is_ignored() {
        let storage = MemoryStore::new();
        let mut cart = CartStore::load(storage.clone(), KEY);
        cart.add(ProductId::new(0), "Ghost", Price::ZERO, "").unwrap();
        assert!(cart.is_empty());
        assert_eq!(storage.get(KEY).unwrap(), None);
    }

    #[test]
    fn test_set_quantity_never_below_one() {
        let mut cart = empty_cart();
        add_units(&mut cart, 1, 3);
        for delta in [-1, -5, -1_000, i64::MIN] {
            cart.set_quantity(ProductId::new(1), delta).unwrap();
            assert!(cart.line(ProductId::new(1)).unwrap().quantity() >= 1);
        }
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity(), 1);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = empty_cart();
        add_units(&mut cart, 1, 1);
        cart.set_quantity(ProductId::new(99), 4).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_absent_id_leaves_cart_unchanged() {
        let mut cart = empty_cart();
        add_units(&mut cart, 1, 2);
        add_units(&mut cart, 2, 1);
        let before = cart.lines().to_vec();
        cart.remove(ProductId::new(42)).unwrap();
        assert_eq!(cart.lines(), before.as_slice());
    }

    #[test]
    fn test_remove_existing_line() {
        let mut cart = empty_cart();
        add_units(&mut cart, 1, 2);
        add_units(&mut cart, 2, 1);
        cart.remove(ProductId::new(1)).unwrap();
        assert!(cart.line(ProductId::new(1)).is_none());
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let storage = MemoryStore::new();
        let mut cart = CartStore::load(storage.clone(), KEY);
        add_units(&mut cart, 1, 2);
        cart.set_quantity(ProductId::new(1), 3).unwrap();

        let reloaded = CartStore::load(storage.clone(), KEY);
        assert_eq!(reloaded.lines(), cart.lines());

        cart.remove(ProductId::new(1)).unwrap();
        assert!(CartStore::load(storage, KEY).is_empty());
    }

    #[test]
    fn test_reload_roundtrip_preserves_order_and_values() {
        let mut cart = empty_cart();
        cart.add(ProductId::new(4), "Night Oud", Price::from_units(900), "n.jpg")
            .unwrap();
        cart.add(ProductId::new(2), "Cedar", Price::from_text("120.75"), "c.jpg")
            .unwrap();
        cart.set_quantity(ProductId::new(2), 2).unwrap();

        let expected = cart.lines().to_vec();
        let reopened = CartStore::load(cart.into_storage(), KEY);
        assert_eq!(reopened.lines(), expected.as_slice());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let seed = MemoryStore::new();
        let mut cart = CartStore::load(seed.clone(), KEY);
        add_units(&mut cart, 1, 1);

        let mut cart = CartStore::load(ReadOnlyStore(seed), KEY);
        assert!(cart.add(ProductId::new(1), "X", Price::ZERO, "").is_err());
        assert!(cart.remove(ProductId::new(1)).is_err());
        assert_eq!(cart.line(ProductId::new(1)).unwrap().quantity(), 1);
    }

    #[test]
    fn test_add_manual_merges_by_name() {
        let mut cart = empty_cart();
        let first = cart
            .add_manual("Gift Box", Price::from_units(30), "box.png")
            .unwrap();
        let second = cart
            .add_manual("Gift Box", Price::from_units(30), "box.png")
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(cart.line(first).unwrap().quantity(), 2);
    }

    #[test]
    fn test_add_manual_ids_are_unique() {
        let mut cart = empty_cart();
        let a = cart.add_manual("A", Price::ZERO, "").unwrap();
        let b = cart.add_manual("B", Price::ZERO, "").unwrap();
        let c = cart.add_manual("C", Price::ZERO, "").unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(cart.lines().len(), 3);
    }
}
