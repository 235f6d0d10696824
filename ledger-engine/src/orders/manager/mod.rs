//! OrderManager - lifecycle transitions and exactly-once fulfillment
//!
//! This module handles:
//! - Intent normalization into canonical orders
//! - Status transitions with authority checks
//! - Fulfillment effects across the three ledgers, atomically
//! - Event generation with global sequence numbers
//! - Event broadcasting to subscribers
//!
//! # Receive Flow
//!
//! ```text
//! receive(order_id, operator)
//!     ├─ 1. Begin write transaction
//!     ├─ 2. Load order
//!     ├─ 3. Idempotency check (fulfillment flag + recorded transaction)
//!     ├─ 4. Authority and transition checks
//!     ├─ 5. Resolve paying account
//!     ├─ 6. Apply kind-specific ledger effects
//!     ├─ 7. Debit account, append linked transaction
//!     ├─ 8. Persist order as Received, store event
//!     ├─ 9. Commit transaction
//!     └─ 10. Broadcast event, return outcome
//! ```
//!
//! Every mutation of the order plus its ledger effects lives in one write
//! transaction, so a crash at any point leaves either all of it or none.

mod error;
pub use error::*;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::ledgers::{AccountStore, InventoryStore, OperationalStore};
use crate::orders::error::OrderError;
use crate::orders::factory;
use crate::orders::fulfillment::{apply_side_effects, EffectContext, FulfillmentOutcome};
use crate::orders::gate::{self, TransitionKind};
use crate::query::LedgerQuery;
use crate::refdata::ReferenceData;
use crate::storage::LedgerStorage;
use shared::order::{EventPayload, Order, OrderEvent, OrderEventType, OrderIntent};
use shared::util::now_millis;
use shared::Permission;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 16384;

/// The authenticated actor behind a lifecycle call
#[derive(Debug, Clone)]
pub struct Operator {
    pub id: i64,
    pub name: String,
    pub permission: Permission,
}

/// OrderManager for lifecycle processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Clients use it to detect restarts and trigger a full resync.
pub struct OrderManager {
    storage: LedgerStorage,
    inventory: InventoryStore,
    accounts: AccountStore,
    operational: OperationalStore,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
    /// Display-name lookup tables for intent denormalization
    refdata: Arc<RwLock<ReferenceData>>,
}

impl std::fmt::Debug for OrderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderManager")
            .field("storage", &"<LedgerStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl OrderManager {
    /// Create a new OrderManager backed by the database at `db_path`
    pub fn new(db_path: impl AsRef<Path>) -> ManagerResult<Self> {
        let storage = LedgerStorage::open(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Create an OrderManager over existing storage
    pub fn with_storage(storage: LedgerStorage) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "OrderManager started with new epoch");
        Self {
            inventory: InventoryStore::new(storage.clone()),
            accounts: AccountStore::new(storage.clone()),
            operational: OperationalStore::new(storage.clone()),
            storage,
            event_tx,
            epoch,
            refdata: Arc::new(RwLock::new(ReferenceData::new())),
        }
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &LedgerStorage {
        &self.storage
    }

    pub fn inventory(&self) -> &InventoryStore {
        &self.inventory
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    pub fn operational(&self) -> &OperationalStore {
        &self.operational
    }

    /// Read-side queries over orders, events and ledgers
    pub fn query(&self) -> LedgerQuery {
        LedgerQuery::new(self.storage.clone())
    }

    /// Register a counterparty display name
    pub fn register_counterparty(&self, id: i64, name: impl Into<String>) {
        self.refdata.write().insert_counterparty(id, name);
    }

    /// Register catalog metadata for an inventory item
    pub fn register_catalog_item(
        &self,
        id: i64,
        name: impl Into<String>,
        unit: impl Into<String>,
    ) {
        self.refdata.write().insert_item(id, name, unit);
    }

    /// Warm the catalog cache from the persisted inventory ledger.
    ///
    /// Called on startup so purchase intents denormalize against the same
    /// names the inventory already carries. Returns the number of items
    /// loaded.
    pub fn warm_catalog_cache(&self) -> ManagerResult<usize> {
        let items = self.inventory.list()?;
        let mut refdata = self.refdata.write();
        for item in &items {
            refdata.insert_item(item.id, item.name.clone(), item.unit.clone());
        }
        tracing::info!(items = items.len(), "Catalog cache warmed from inventory");
        Ok(items.len())
    }

    /// Normalize an intent into a Pending order and persist it.
    pub fn create_order(&self, intent: OrderIntent, operator: &Operator) -> ManagerResult<Order> {
        let order = {
            let refdata = self.refdata.read();
            factory::build(intent, &refdata)?
        };

        let txn = self.storage.begin_write()?;
        let sequence = self.storage.get_current_sequence_txn(&txn)? + 1;
        self.storage.insert_order(&txn, &order)?;
        self.storage.mark_order_open(&txn, order.id)?;

        let event = OrderEvent::new(
            sequence,
            order.id,
            operator.id,
            operator.name.clone(),
            now_millis(),
            OrderEventType::OrderCreated,
            EventPayload::OrderCreated {
                kind: order.kind,
                counterparty_name: order.counterparty_name.clone(),
                total: order.total,
            },
        );
        self.storage.store_event(&txn, &event)?;
        self.storage.set_sequence(&txn, sequence)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(
            order_id = order.id,
            kind = %order.kind,
            total = order.total,
            operator = %operator.name,
            "Order created"
        );
        self.broadcast(event);
        Ok(order)
    }

    /// Move a Pending order to Approved.
    pub fn approve(&self, order_id: i64, operator: &Operator) -> ManagerResult<Order> {
        gate::check_authority(&operator.permission, TransitionKind::Approve)?;

        let txn = self.storage.begin_write()?;
        let mut order = self.load_order(&txn, order_id)?;
        order.status = gate::next_status(order.status, TransitionKind::Approve)?;
        self.storage.put_order(&txn, &order)?;

        let sequence = self.storage.get_current_sequence_txn(&txn)? + 1;
        let event = OrderEvent::new(
            sequence,
            order.id,
            operator.id,
            operator.name.clone(),
            now_millis(),
            OrderEventType::OrderApproved,
            EventPayload::OrderApproved {},
        );
        self.storage.store_event(&txn, &event)?;
        self.storage.set_sequence(&txn, sequence)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(order_id, operator = %operator.name, "Order approved");
        self.broadcast(event);
        Ok(order)
    }

    /// Move a Pending order to Cancelled. No ledger is touched.
    pub fn reject(
        &self,
        order_id: i64,
        reason: Option<String>,
        operator: &Operator,
    ) -> ManagerResult<Order> {
        gate::check_authority(&operator.permission, TransitionKind::Reject)?;

        let txn = self.storage.begin_write()?;
        let mut order = self.load_order(&txn, order_id)?;
        order.status = gate::next_status(order.status, TransitionKind::Reject)?;
        self.storage.put_order(&txn, &order)?;
        self.storage.mark_order_closed(&txn, order.id)?;

        let sequence = self.storage.get_current_sequence_txn(&txn)? + 1;
        let event = OrderEvent::new(
            sequence,
            order.id,
            operator.id,
            operator.name.clone(),
            now_millis(),
            OrderEventType::OrderRejected,
            EventPayload::OrderRejected {
                reason: reason.clone(),
            },
        );
        self.storage.store_event(&txn, &event)?;
        self.storage.set_sequence(&txn, sequence)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(order_id, reason = ?reason, operator = %operator.name, "Order rejected");
        self.broadcast(event);
        Ok(order)
    }

    /// Fulfill an Approved order: apply its ledger effects exactly once and
    /// move it to Received.
    ///
    /// Receiving an already-received order is a safe no-op that returns the
    /// recorded outcome with `already_applied` set.
    pub fn receive(&self, order_id: i64, operator: &Operator) -> ManagerResult<FulfillmentOutcome> {
        let txn = self.storage.begin_write()?;
        let mut order = self.load_order(&txn, order_id)?;

        // Idempotency first: the flag and the transaction index are written
        // in the same transaction as the effects, so either is authoritative
        if order.fulfillment_applied {
            drop(txn);
            return self.recorded_outcome(&order);
        }
        if let Some(recorded) = self.storage.transaction_by_order_txn(&txn, order_id)? {
            tracing::warn!(
                order_id,
                transaction_id = recorded.id,
                "Fulfillment transaction exists but flag unset, treating as applied"
            );
            drop(txn);
            return self.recorded_outcome(&order);
        }

        gate::check_authority(&operator.permission, TransitionKind::Receive)?;
        order.status = gate::next_status(order.status, TransitionKind::Receive)?;

        let now = now_millis();
        let (account, default_account_used) =
            self.accounts.resolve_account(&txn, order.target_account_id)?;

        let ctx = EffectContext {
            txn: &txn,
            order: &order,
            inventory: &self.inventory,
            operational: &self.operational,
            now,
        };
        let warnings = apply_side_effects(&ctx)?;

        let description = format!("{} - {}", order.kind, order.counterparty_name);
        let transaction = self.accounts.debit(
            &txn,
            account.id,
            order.total,
            Some(order.id),
            description,
            default_account_used,
        )?;

        order.fulfillment_applied = true;
        self.storage.put_order(&txn, &order)?;
        self.storage.mark_order_closed(&txn, order.id)?;

        let sequence = self.storage.get_current_sequence_txn(&txn)? + 1;
        let event = OrderEvent::new(
            sequence,
            order.id,
            operator.id,
            operator.name.clone(),
            now,
            OrderEventType::OrderFulfilled,
            EventPayload::OrderFulfilled {
                transaction_id: transaction.id,
                account_id: account.id,
                amount: transaction.amount,
                default_account_used,
                warnings: warnings.clone(),
            },
        );
        self.storage.store_event(&txn, &event)?;
        self.storage.set_sequence(&txn, sequence)?;
        txn.commit().map_err(crate::storage::StorageError::from)?;

        tracing::info!(
            order_id,
            transaction_id = transaction.id,
            account_id = account.id,
            amount = transaction.amount,
            warnings = warnings.len(),
            operator = %operator.name,
            "Order fulfilled"
        );
        self.broadcast(event);

        Ok(FulfillmentOutcome {
            order_id,
            transaction_id: transaction.id,
            account_id: account.id,
            amount: transaction.amount,
            default_account_used,
            warnings,
            already_applied: false,
        })
    }

    fn load_order(
        &self,
        txn: &redb::WriteTransaction,
        order_id: i64,
    ) -> ManagerResult<Order> {
        self.storage
            .get_order_txn(txn, order_id)?
            .ok_or(ManagerError::Order(OrderError::OrderNotFound(order_id)))
    }

    /// Reconstruct the outcome of a fulfillment that already happened.
    ///
    /// Warnings are not stored on the transaction, so they are recovered
    /// from the `OrderFulfilled` event payload.
    fn recorded_outcome(&self, order: &Order) -> ManagerResult<FulfillmentOutcome> {
        let transaction = self
            .storage
            .transaction_by_order(order.id)?
            .ok_or(ManagerError::MissingFulfillmentRecord(order.id))?;
        let warnings = self
            .storage
            .events_for_order(order.id)?
            .into_iter()
            .find_map(|ev| match ev.payload {
                EventPayload::OrderFulfilled { warnings, .. } => Some(warnings),
                _ => None,
            })
            .unwrap_or_default();
        tracing::debug!(
            order_id = order.id,
            transaction_id = transaction.id,
            "Duplicate receive, returning recorded outcome"
        );
        Ok(FulfillmentOutcome {
            order_id: order.id,
            transaction_id: transaction.id,
            account_id: transaction.account_id,
            amount: transaction.amount,
            default_account_used: transaction.default_account_used,
            warnings,
            already_applied: true,
        })
    }

    fn broadcast(&self, event: OrderEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Event broadcast skipped: no active receivers");
        }
    }
}

#[cfg(test)]
mod tests;
