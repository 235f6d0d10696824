//! Shared types for the fleetledger engine
//!
//! Domain types consumed by both the engine and its callers: the canonical
//! order record and its six intent shapes, the audit event stream, and the
//! ledger models (inventory, accounts, operational records).

pub mod models;
pub mod order;
pub mod types;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use order::{
    DocumentRef, EventPayload, FulfillmentWarning, LineItem, Order, OrderEvent, OrderEventType,
    OrderIntent, OrderKind, OrderStatus,
};
pub use types::{Permission, Timestamp};
