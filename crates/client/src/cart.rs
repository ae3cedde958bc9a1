//! The locally persisted shopping cart.
//!
//! The cart never talks to the backend. It holds book ids and quantities
//! in storage and prices are resolved at read time against whatever
//! catalog data the caller has, so a stale cart entry can never pin a
//! stale price.

use std::sync::Arc;

use folio_core::BookId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{StorageBackend, StorageError, keys};

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub book_id: BookId,
    pub quantity: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Cart {
    items: Vec<CartItem>,
}

/// Cart operations over a storage backend.
#[derive(Clone)]
pub struct CartStore {
    storage: Arc<dyn StorageBackend>,
}

impl CartStore {
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Current cart lines. A corrupt cart entry is deleted and treated
    /// as empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage backend itself fails.
    pub fn items(&self) -> Result<Vec<CartItem>, StorageError> {
        Ok(self.load()?.items)
    }

    /// Add `quantity` of a book, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn add(&self, book_id: &BookId, quantity: u32) -> Result<Vec<CartItem>, StorageError> {
        let mut cart = self.load()?;
        if let Some(item) = cart.items.iter_mut().find(|item| item.book_id == *book_id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            cart.items.push(CartItem {
                book_id: book_id.clone(),
                quantity,
            });
        }
        self.save(&cart)?;
        Ok(cart.items)
    }

    /// Remove a book's line entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn remove(&self, book_id: &BookId) -> Result<Vec<CartItem>, StorageError> {
        let mut cart = self.load()?;
        cart.items.retain(|item| item.book_id != *book_id);
        self.save(&cart)?;
        Ok(cart.items)
    }

    /// Set a line's quantity. Zero removes the line. A book that is not
    /// in the cart is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn set_quantity(
        &self,
        book_id: &BookId,
        quantity: u32,
    ) -> Result<Vec<CartItem>, StorageError> {
        if quantity == 0 {
            return self.remove(book_id);
        }
        let mut cart = self.load()?;
        if let Some(item) = cart.items.iter_mut().find(|item| item.book_id == *book_id) {
            item.quantity = quantity;
            self.save(&cart)?;
        }
        Ok(cart.items)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.save(&Cart::default())
    }

    /// Total number of copies across all lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn count(&self) -> Result<u32, StorageError> {
        Ok(self
            .load()?
            .items
            .iter()
            .fold(0, |total, item| total.saturating_add(item.quantity)))
    }

    /// Price the cart with the given lookup. Lines the lookup does not
    /// know contribute zero rather than failing the whole total.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    pub fn total<F>(&self, price_of: F) -> Result<Decimal, StorageError>
    where
        F: Fn(&BookId) -> Option<Decimal>,
    {
        Ok(self
            .load()?
            .items
            .iter()
            .filter_map(|item| {
                price_of(&item.book_id).map(|price| price * Decimal::from(item.quantity))
            })
            .sum())
    }

    fn load(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.storage.get(keys::CART)? else {
            return Ok(Cart::default());
        };

        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(cart),
            Err(error) => {
                warn!(%error, "stored cart is corrupt, clearing it");
                self.storage.remove(keys::CART)?;
                Ok(Cart::default())
            }
        }
    }

    fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let raw = serde_json::to_string(cart)?;
        self.storage.set(keys::CART, &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn cart() -> (Arc<MemoryStorage>, CartStore) {
        let storage = Arc::new(MemoryStorage::new());
        let cart = CartStore::new(storage.clone());
        (storage, cart)
    }

    #[test]
    fn test_add_merges_existing_lines() {
        let (_, cart) = cart();
        let book = BookId::new("b1");

        cart.add(&book, 1).unwrap();
        let items = cart.add(&book, 2).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_remove_drops_the_line() {
        let (_, cart) = cart();
        cart.add(&BookId::new("b1"), 1).unwrap();
        cart.add(&BookId::new("b2"), 1).unwrap();

        let items = cart.remove(&BookId::new("b1")).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].book_id.as_str(), "b2");
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let (_, cart) = cart();
        let book = BookId::new("b1");
        cart.add(&book, 2).unwrap();

        let items = cart.set_quantity(&book, 0).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_set_quantity_replaces_rather_than_merges() {
        let (_, cart) = cart();
        let book = BookId::new("b1");
        cart.add(&book, 2).unwrap();

        let items = cart.set_quantity(&book, 5).unwrap();
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn test_set_quantity_ignores_unknown_book() {
        let (_, cart) = cart();
        cart.add(&BookId::new("b1"), 1).unwrap();

        let items = cart.set_quantity(&BookId::new("nope"), 4).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].book_id.as_str(), "b1");
    }

    #[test]
    fn test_count_sums_quantities() {
        let (_, cart) = cart();
        cart.add(&BookId::new("b1"), 2).unwrap();
        cart.add(&BookId::new("b2"), 3).unwrap();

        assert_eq!(cart.count().unwrap(), 5);
    }

    #[test]
    fn test_total_tracks_quantity_changes() {
        let (_, cart) = cart();
        let hardback = BookId::new("b1");
        let paperback = BookId::new("b2");
        cart.add(&hardback, 2).unwrap();
        cart.add(&paperback, 3).unwrap();

        let price = |id: &BookId| match id.as_str() {
            "b1" => Some(Decimal::from(10)),
            "b2" => Some(Decimal::from(5)),
            _ => None,
        };
        assert_eq!(cart.total(price).unwrap(), Decimal::from(35));

        cart.set_quantity(&hardback, 0).unwrap();
        assert_eq!(cart.total(price).unwrap(), Decimal::from(15));
    }

    #[test]
    fn test_total_skips_unknown_books() {
        let (_, cart) = cart();
        cart.add(&BookId::new("b1"), 2).unwrap();
        cart.add(&BookId::new("gone"), 9).unwrap();

        let total = cart
            .total(|id| (id.as_str() == "b1").then(|| Decimal::new(1049, 2)))
            .unwrap();

        assert_eq!(total, Decimal::new(2098, 2));
    }

    #[test]
    fn test_corrupt_cart_self_heals() {
        let (storage, cart) = cart();
        storage.set(keys::CART, "not a cart").unwrap();

        assert!(cart.items().unwrap().is_empty());
        assert!(storage.get(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_clear_empties_the_cart() {
        let (_, cart) = cart();
        cart.add(&BookId::new("b1"), 2).unwrap();

        cart.clear().unwrap();
        assert!(cart.items().unwrap().is_empty());
    }
}
