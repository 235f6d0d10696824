//! Fulfillment side effects
//!
//! Receiving an order applies its ledger effects exactly once. The kind of
//! the order selects one [`effects::SideEffect`] implementation; the account
//! debit itself is common to every kind and stays with the manager. All
//! effects run inside the caller's write transaction, so a failure in any
//! of them aborts the whole fulfillment.

pub mod effects;

use redb::WriteTransaction;
use serde::{Deserialize, Serialize};

use crate::ledgers::{InventoryStore, LedgerResult, OperationalStore};
use shared::order::{FulfillmentWarning, Order};
use shared::Timestamp;

/// Everything a side effect may touch while fulfilling one order
pub struct EffectContext<'a> {
    pub txn: &'a WriteTransaction,
    pub order: &'a Order,
    pub inventory: &'a InventoryStore,
    pub operational: &'a OperationalStore,
    pub now: Timestamp,
}

/// The durable result of one fulfillment.
///
/// Returned both for a fresh receipt and for an idempotent replay; in the
/// replay case `already_applied` is set and the outcome is reconstructed
/// from the recorded transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentOutcome {
    pub order_id: i64,
    pub transaction_id: i64,
    pub account_id: i64,
    pub amount: f64,
    pub default_account_used: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<FulfillmentWarning>,
    #[serde(default)]
    pub already_applied: bool,
}

/// Apply the kind-specific ledger effects for an order.
pub fn apply_side_effects(ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>> {
    effects::for_kind(ctx.order.kind).apply(ctx)
}
