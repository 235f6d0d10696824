//! redb-based storage layer shared by the order repository and the ledgers
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` | Canonical order records |
//! | `open_orders` | `order_id` | `()` | Pending/Approved index |
//! | `events` | `(order_id, sequence)` | `OrderEvent` | Audit stream (append-only) |
//! | `transactions` | `txn_id` | `Transaction` | Account log (append-only) |
//! | `txn_by_order` | `order_id` | `txn_id` | Unique index, idempotency guard |
//! | `inventory` | `item_id` | `InventoryItem` | Stock quantities |
//! | `accounts` | `account_id` | `Account` | Balances |
//! | `fuel_logs` | `(vehicle_id, log_id)` | `FuelLog` | Operational store |
//! | `maintenance_log` | `(vehicle_id, rec_id)` | `MaintenanceRecord` | Operational store |
//! | `payroll` | `record_id` | `PayrollRecord` | Operational store |
//! | `sequence_counter` | `()` | `u64` | Global event sequence |
//!
//! # Durability
//!
//! One `Database` backs every table, so a single `WriteTransaction` spans
//! the order record and all three ledgers touched by a fulfillment. redb
//! commits are copy-on-write with an atomic pointer swap; a crash mid
//! fulfillment leaves the pre-attempt state, never a partial application.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use shared::models::{Account, FuelLog, InventoryItem, MaintenanceRecord, PayrollRecord, Transaction};
use shared::order::{Order, OrderEvent};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Canonical order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Index of non-terminal orders: key = order_id, value = empty
const OPEN_ORDERS_TABLE: TableDefinition<i64, ()> = TableDefinition::new("open_orders");

/// Audit events: key = (order_id, sequence), value = JSON-serialized OrderEvent
const EVENTS_TABLE: TableDefinition<(i64, u64), &[u8]> = TableDefinition::new("events");

/// Account log entries: key = txn_id, value = JSON-serialized Transaction
const TRANSACTIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("transactions");

/// Unique secondary index: key = order_id, value = txn_id.
/// Structurally enforces at-most-one transaction per order.
const TXN_BY_ORDER_TABLE: TableDefinition<i64, i64> = TableDefinition::new("txn_by_order");

/// Inventory items: key = item_id, value = JSON-serialized InventoryItem
const INVENTORY_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("inventory");

/// Accounts: key = account_id, value = JSON-serialized Account
const ACCOUNTS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("accounts");

/// Fuel logs: key = (vehicle_id, log_id), value = JSON-serialized FuelLog
const FUEL_LOGS_TABLE: TableDefinition<(i64, i64), &[u8]> = TableDefinition::new("fuel_logs");

/// Maintenance history: key = (vehicle_id, record_id), value = JSON-serialized MaintenanceRecord
const MAINTENANCE_TABLE: TableDefinition<(i64, i64), &[u8]> =
    TableDefinition::new("maintenance_log");

/// Payroll records: key = record_id, value = JSON-serialized PayrollRecord
const PAYROLL_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("payroll");

/// Sequence counter: key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const SEQUENCE_KEY: &str = "seq";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order already exists: {0}")]
    DuplicateOrder(i64),

    #[error("Transaction already recorded for order {0}")]
    DuplicateOrderTransaction(i64),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backed by redb, shared by the repository and the three ledgers
#[derive(Clone)]
pub struct LedgerStorage {
    db: Arc<Database>,
}

impl LedgerStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, ephemeral consumers)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables up front so read transactions never race table
        // creation
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(TRANSACTIONS_TABLE)?;
            let _ = write_txn.open_table(TXN_BY_ORDER_TABLE)?;
            let _ = write_txn.open_table(INVENTORY_TABLE)?;
            let _ = write_txn.open_table(ACCOUNTS_TABLE)?;
            let _ = write_txn.open_table(FUEL_LOGS_TABLE)?;
            let _ = write_txn.open_table(MAINTENANCE_TABLE)?;
            let _ = write_txn.open_table(PAYROLL_TABLE)?;

            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    ///
    /// redb allows one writer at a time; this is what serializes concurrent
    /// receipt attempts.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Current global event sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Current sequence within a write transaction
    pub fn get_current_sequence_txn(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let table = txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set the sequence counter (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Order Operations ==========

    /// Append a new order; fails if the id is already present
    pub fn insert_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        if table.get(order.id)?.is_some() {
            return Err(StorageError::DuplicateOrder(order.id));
        }
        let bytes = serde_json::to_vec(order)?;
        table.insert(order.id, bytes.as_slice())?;
        Ok(())
    }

    /// Overwrite an existing order record (status transitions only; the
    /// manager is the single caller)
    pub fn put_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let bytes = serde_json::to_vec(order)?;
        table.insert(order.id, bytes.as_slice())?;
        Ok(())
    }

    /// Get an order by id (read-only)
    pub fn get_order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order within a write transaction
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;
        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All orders, ascending id (creation-time ordered for snowflake ids)
    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        Ok(orders)
    }

    /// Track a non-terminal order
    pub fn mark_order_open(&self, txn: &WriteTransaction, order_id: i64) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.insert(order_id, ())?;
        Ok(())
    }

    /// Remove a terminal order from the open index
    pub fn mark_order_closed(&self, txn: &WriteTransaction, order_id: i64) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    /// IDs of all Pending/Approved orders
    pub fn open_order_ids(&self) -> StorageResult<Vec<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        let mut ids = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            ids.push(key.value());
        }
        Ok(ids)
    }

    // ========== Event Operations ==========

    /// Append an audit event
    pub fn store_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let bytes = serde_json::to_vec(event)?;
        table.insert((event.order_id, event.sequence), bytes.as_slice())?;
        Ok(())
    }

    /// All events for one order, sequence order
    pub fn events_for_order(&self, order_id: i64) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;
        let mut events = Vec::new();
        for entry in table.range((order_id, 0u64)..=(order_id, u64::MAX))? {
            let (_, value) = entry?;
            events.push(serde_json::from_slice(value.value())?);
        }
        Ok(events)
    }

    // ========== Transaction Operations ==========

    /// Append a transaction, maintaining the unique order index.
    ///
    /// Fails with `DuplicateOrderTransaction` if the order already has one;
    /// the fulfillment idempotency check runs first, so hitting this means
    /// a logic error upstream.
    pub fn insert_transaction(
        &self,
        txn: &WriteTransaction,
        transaction: &Transaction,
    ) -> StorageResult<()> {
        if let Some(order_id) = transaction.order_id {
            let mut index = txn.open_table(TXN_BY_ORDER_TABLE)?;
            if index.get(order_id)?.is_some() {
                return Err(StorageError::DuplicateOrderTransaction(order_id));
            }
            index.insert(order_id, transaction.id)?;
        }
        let mut table = txn.open_table(TRANSACTIONS_TABLE)?;
        let bytes = serde_json::to_vec(transaction)?;
        table.insert(transaction.id, bytes.as_slice())?;
        Ok(())
    }

    /// The transaction created for an order, if any (read-only)
    pub fn transaction_by_order(&self, order_id: i64) -> StorageResult<Option<Transaction>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(TXN_BY_ORDER_TABLE)?;
        let Some(txn_id) = index.get(order_id)?.map(|g| g.value()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(TRANSACTIONS_TABLE)?;
        match table.get(txn_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Same lookup within a write transaction (fulfillment idempotency check)
    pub fn transaction_by_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StorageResult<Option<Transaction>> {
        let index = txn.open_table(TXN_BY_ORDER_TABLE)?;
        let Some(txn_id) = index.get(order_id)?.map(|g| g.value()) else {
            return Ok(None);
        };
        let table = txn.open_table(TRANSACTIONS_TABLE)?;
        match table.get(txn_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// All transactions for one account, ascending id
    pub fn transactions_for_account(&self, account_id: i64) -> StorageResult<Vec<Transaction>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS_TABLE)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let t: Transaction = serde_json::from_slice(value.value())?;
            if t.account_id == account_id {
                out.push(t);
            }
        }
        Ok(out)
    }

    /// Every transaction in the log
    pub fn list_transactions(&self) -> StorageResult<Vec<Transaction>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TRANSACTIONS_TABLE)?;
        let mut out = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(value.value())?);
        }
        Ok(out)
    }

    // ========== Inventory Operations ==========

    pub fn put_item(&self, txn: &WriteTransaction, item: &InventoryItem) -> StorageResult<()> {
        let mut table = txn.open_table(INVENTORY_TABLE)?;
        let bytes = serde_json::to_vec(item)?;
        table.insert(item.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_item(&self, item_id: i64) -> StorageResult<Option<InventoryItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(INVENTORY_TABLE)?;
        match table.get(item_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_item_txn(
        &self,
        txn: &WriteTransaction,
        item_id: i64,
    ) -> StorageResult<Option<InventoryItem>> {
        let table = txn.open_table(INVENTORY_TABLE)?;
        match table.get(item_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_items(&self) -> StorageResult<Vec<InventoryItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(INVENTORY_TABLE)?;
        let mut items = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    // ========== Account Operations ==========

    pub fn put_account(&self, txn: &WriteTransaction, account: &Account) -> StorageResult<()> {
        let mut table = txn.open_table(ACCOUNTS_TABLE)?;
        let bytes = serde_json::to_vec(account)?;
        table.insert(account.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_account(&self, account_id: i64) -> StorageResult<Option<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS_TABLE)?;
        match table.get(account_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_account_txn(
        &self,
        txn: &WriteTransaction,
        account_id: i64,
    ) -> StorageResult<Option<Account>> {
        let table = txn.open_table(ACCOUNTS_TABLE)?;
        match table.get(account_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Lowest-id account - the canonical default fallback ordering.
    /// redb iterates keys in sorted order, so the first entry is stable.
    pub fn first_account_txn(&self, txn: &WriteTransaction) -> StorageResult<Option<Account>> {
        let table = txn.open_table(ACCOUNTS_TABLE)?;
        match table.iter()?.next() {
            Some(entry) => {
                let (_, value) = entry?;
                Ok(Some(serde_json::from_slice(value.value())?))
            }
            None => Ok(None),
        }
    }

    pub fn list_accounts(&self) -> StorageResult<Vec<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS_TABLE)?;
        let mut accounts = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            accounts.push(serde_json::from_slice(value.value())?);
        }
        Ok(accounts)
    }

    // ========== Operational Store Operations ==========

    pub fn put_fuel_log(&self, txn: &WriteTransaction, log: &FuelLog) -> StorageResult<()> {
        let mut table = txn.open_table(FUEL_LOGS_TABLE)?;
        let bytes = serde_json::to_vec(log)?;
        table.insert((log.vehicle_id, log.id), bytes.as_slice())?;
        Ok(())
    }

    pub fn fuel_logs_for_vehicle(&self, vehicle_id: i64) -> StorageResult<Vec<FuelLog>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(FUEL_LOGS_TABLE)?;
        let mut logs = Vec::new();
        for entry in table.range((vehicle_id, 0i64)..=(vehicle_id, i64::MAX))? {
            let (_, value) = entry?;
            logs.push(serde_json::from_slice(value.value())?);
        }
        Ok(logs)
    }

    pub fn put_maintenance_record(
        &self,
        txn: &WriteTransaction,
        record: &MaintenanceRecord,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(MAINTENANCE_TABLE)?;
        let bytes = serde_json::to_vec(record)?;
        table.insert((record.vehicle_id, record.id), bytes.as_slice())?;
        Ok(())
    }

    pub fn maintenance_for_vehicle(
        &self,
        vehicle_id: i64,
    ) -> StorageResult<Vec<MaintenanceRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(MAINTENANCE_TABLE)?;
        let mut records = Vec::new();
        for entry in table.range((vehicle_id, 0i64)..=(vehicle_id, i64::MAX))? {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }

    pub fn put_payroll_record(
        &self,
        txn: &WriteTransaction,
        record: &PayrollRecord,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PAYROLL_TABLE)?;
        let bytes = serde_json::to_vec(record)?;
        table.insert(record.id, bytes.as_slice())?;
        Ok(())
    }

    pub fn get_payroll_record(&self, record_id: i64) -> StorageResult<Option<PayrollRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYROLL_TABLE)?;
        match table.get(record_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_payroll_record_txn(
        &self,
        txn: &WriteTransaction,
        record_id: i64,
    ) -> StorageResult<Option<PayrollRecord>> {
        let table = txn.open_table(PAYROLL_TABLE)?;
        match table.get(record_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_payroll_records(&self) -> StorageResult<Vec<PayrollRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYROLL_TABLE)?;
        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }
}
