//! Read-side queries over orders, events and the three ledgers
//!
//! Listings materialize from full table scans; the data set here is
//! thousands of records, not millions, and redb reads never block the
//! writer.

use serde::{Deserialize, Serialize};

use crate::storage::{LedgerStorage, StorageResult};
use shared::models::{Account, FuelLog, InventoryItem, MaintenanceRecord, PayrollRecord, Transaction};
use shared::order::{Order, OrderEvent, OrderKind, OrderStatus};
use shared::Timestamp;

/// Conjunctive order listing filter; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<OrderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_after: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_before: Option<Timestamp>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        if let Some(status) = self.status
            && order.status != status
        {
            return false;
        }
        if let Some(kind) = self.kind
            && order.kind != kind
        {
            return false;
        }
        if let Some(counterparty_id) = self.counterparty_id
            && order.counterparty_id != counterparty_id
        {
            return false;
        }
        if let Some(after) = self.issued_after
            && order.issued_at < after
        {
            return false;
        }
        if let Some(before) = self.issued_before
            && order.issued_at > before
        {
            return false;
        }
        true
    }
}

/// Query facade over the shared storage
#[derive(Clone)]
pub struct LedgerQuery {
    storage: LedgerStorage,
}

impl LedgerQuery {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    pub fn order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        self.storage.get_order(order_id)
    }

    /// Orders matching the filter, newest first
    pub fn orders(&self, filter: &OrderFilter) -> StorageResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .storage
            .list_orders()?
            .into_iter()
            .filter(|o| filter.matches(o))
            .collect();
        orders.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(orders)
    }

    /// Non-terminal orders (Pending or Approved)
    pub fn open_orders(&self) -> StorageResult<Vec<Order>> {
        let mut orders = Vec::new();
        for id in self.storage.open_order_ids()? {
            if let Some(order) = self.storage.get_order(id)? {
                orders.push(order);
            }
        }
        orders.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(orders)
    }

    /// The audit stream for one order, in sequence order
    pub fn events_for_order(&self, order_id: i64) -> StorageResult<Vec<OrderEvent>> {
        self.storage.events_for_order(order_id)
    }

    pub fn accounts(&self) -> StorageResult<Vec<Account>> {
        self.storage.list_accounts()
    }

    pub fn inventory(&self) -> StorageResult<Vec<InventoryItem>> {
        self.storage.list_items()
    }

    /// Items below their reorder threshold
    pub fn low_stock_items(&self) -> StorageResult<Vec<InventoryItem>> {
        Ok(self
            .storage
            .list_items()?
            .into_iter()
            .filter(|item| item.is_low_stock())
            .collect())
    }

    pub fn transaction_for_order(&self, order_id: i64) -> StorageResult<Option<Transaction>> {
        self.storage.transaction_by_order(order_id)
    }

    pub fn transactions_for_account(&self, account_id: i64) -> StorageResult<Vec<Transaction>> {
        self.storage.transactions_for_account(account_id)
    }

    pub fn fuel_history(&self, vehicle_id: i64) -> StorageResult<Vec<FuelLog>> {
        self.storage.fuel_logs_for_vehicle(vehicle_id)
    }

    pub fn maintenance_history(&self, vehicle_id: i64) -> StorageResult<Vec<MaintenanceRecord>> {
        self.storage.maintenance_for_vehicle(vehicle_id)
    }

    pub fn unpaid_payroll(&self) -> StorageResult<Vec<PayrollRecord>> {
        Ok(self
            .storage
            .list_payroll_records()?
            .into_iter()
            .filter(|record| !record.paid)
            .collect())
    }
}
