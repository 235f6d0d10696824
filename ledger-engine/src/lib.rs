//! Order lifecycle and cross-ledger consistency engine
//!
//! Heterogeneous expense/purchase orders are built by the factory, routed
//! through an approval gate, and on receipt their effects are applied to
//! three subordinate ledgers (inventory, accounts, operational records)
//! exactly once.
//!
//! # Architecture
//!
//! ```text
//! OrderIntent → factory → Order (Pending)
//!                             │ approve / reject     (approval gate)
//!                             ▼
//!                         Approved ── receive ──► fulfillment ── one redb txn
//!                                                     │   inventory / accounts
//!                                                     │   / operational stores
//!                                                     ▼
//!                                                 Received + OrderFulfilled event
//! ```
//!
//! All mutations for a single receipt share one write transaction, so a
//! failed sub-step leaves no partial ledger state. The `txn_by_order`
//! unique index plus the `fulfillment_applied` flag make a retried receipt
//! a safe no-op.

pub mod config;
pub mod ledgers;
pub mod logging;
pub mod orders;
pub mod query;
pub mod refdata;
pub mod storage;

// Re-exports
pub use ledgers::{AccountStore, InventoryStore, LedgerError, OperationalStore};
pub use orders::factory;
pub use orders::gate::{self, TransitionKind};
pub use orders::manager::{ManagerError, ManagerResult, OrderManager, Operator};
pub use orders::{FulfillmentOutcome, OrderError};
pub use query::{LedgerQuery, OrderFilter};
pub use refdata::{CatalogItemMeta, ReferenceData};
pub use storage::{LedgerStorage, StorageError};

// Re-export shared types for convenience
pub use shared::order::{
    Order, OrderEvent, OrderEventType, OrderIntent, OrderKind, OrderStatus,
};
