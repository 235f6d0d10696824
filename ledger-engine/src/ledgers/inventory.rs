//! Inventory store - stock quantities
//!
//! Quantities move only through `adjust_quantity`, which reads and writes
//! inside the caller's transaction; there is no way to race two receipts
//! into a lost update because redb serializes writers.

use redb::WriteTransaction;

use crate::orders::money::{round_quantity, QUANTITY_TOLERANCE};
use crate::storage::LedgerStorage;
use shared::models::InventoryItem;

use super::{LedgerError, LedgerResult};

/// Handle over the inventory table
#[derive(Clone)]
pub struct InventoryStore {
    storage: LedgerStorage,
}

impl InventoryStore {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Create or replace a catalog item (stock-count edits, seeding)
    pub fn upsert_item(&self, txn: &WriteTransaction, item: &InventoryItem) -> LedgerResult<()> {
        self.storage.put_item(txn, item)?;
        Ok(())
    }

    pub fn get(&self, item_id: i64) -> LedgerResult<Option<InventoryItem>> {
        Ok(self.storage.get_item(item_id)?)
    }

    pub fn get_txn(
        &self,
        txn: &WriteTransaction,
        item_id: i64,
    ) -> LedgerResult<Option<InventoryItem>> {
        Ok(self.storage.get_item_txn(txn, item_id)?)
    }

    pub fn list(&self) -> LedgerResult<Vec<InventoryItem>> {
        Ok(self.storage.list_items()?)
    }

    /// Atomically apply a signed quantity delta; returns the new quantity.
    ///
    /// A delta that would take the quantity below zero is a hard error and
    /// writes nothing. Small float residue is tolerated and clamped to
    /// exactly zero.
    pub fn adjust_quantity(
        &self,
        txn: &WriteTransaction,
        item_id: i64,
        delta: f64,
    ) -> LedgerResult<f64> {
        let mut item = self
            .storage
            .get_item_txn(txn, item_id)?
            .ok_or(LedgerError::ItemNotFound(item_id))?;

        let new_quantity = round_quantity(item.quantity + delta);
        if new_quantity < -QUANTITY_TOLERANCE {
            return Err(LedgerError::InsufficientStock {
                item_id,
                requested: -delta,
                available: item.quantity,
            });
        }

        item.quantity = new_quantity.max(0.0);
        self.storage.put_item(txn, &item)?;
        tracing::debug!(item_id, delta, new_quantity = item.quantity, "Stock adjusted");
        Ok(item.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_store(quantity: f64) -> (LedgerStorage, InventoryStore) {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let store = InventoryStore::new(storage.clone());
        let txn = storage.begin_write().unwrap();
        store
            .upsert_item(
                &txn,
                &InventoryItem {
                    id: 1,
                    name: "Filtro de aceite".into(),
                    unit: "ud".into(),
                    quantity,
                    min_stock: 2.0,
                    unit_price: 12.5,
                },
            )
            .unwrap();
        txn.commit().unwrap();
        (storage, store)
    }

    #[test]
    fn test_adjust_quantity_increments() {
        let (storage, store) = seeded_store(3.0);
        let txn = storage.begin_write().unwrap();
        let new_qty = store.adjust_quantity(&txn, 1, 10.0).unwrap();
        assert_eq!(new_qty, 13.0);
        txn.commit().unwrap();
        assert_eq!(store.get(1).unwrap().unwrap().quantity, 13.0);
    }

    #[test]
    fn test_adjust_quantity_rejects_below_zero() {
        let (storage, store) = seeded_store(3.0);
        let txn = storage.begin_write().unwrap();
        let err = store.adjust_quantity(&txn, 1, -5.0).unwrap_err();
        match err {
            LedgerError::InsufficientStock {
                item_id,
                requested,
                available,
            } => {
                assert_eq!(item_id, 1);
                assert_eq!(requested, 5.0);
                assert_eq!(available, 3.0);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
        drop(txn);
        // untouched
        assert_eq!(store.get(1).unwrap().unwrap().quantity, 3.0);
    }

    #[test]
    fn test_adjust_to_exactly_zero_is_allowed() {
        let (storage, store) = seeded_store(5.0);
        let txn = storage.begin_write().unwrap();
        let new_qty = store.adjust_quantity(&txn, 1, -5.0).unwrap();
        assert_eq!(new_qty, 0.0);
    }

    #[test]
    fn test_fractional_quantities() {
        let (storage, store) = seeded_store(2.5);
        let txn = storage.begin_write().unwrap();
        let new_qty = store.adjust_quantity(&txn, 1, -1.25).unwrap();
        assert_eq!(new_qty, 1.25);
    }

    #[test]
    fn test_unknown_item_errors() {
        let (storage, store) = seeded_store(1.0);
        let txn = storage.begin_write().unwrap();
        let err = store.adjust_quantity(&txn, 99, 1.0).unwrap_err();
        assert!(matches!(err, LedgerError::ItemNotFound(99)));
    }
}
