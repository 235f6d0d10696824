//! Ledger data models
//!
//! Shared between the engine and read-only consumers (dashboards, exports).
//! All IDs are snowflake `i64`.

pub mod account;
pub mod inventory_item;
pub mod operational;
pub mod transaction;

// Re-exports
pub use account::*;
pub use inventory_item::*;
pub use operational::*;
pub use transaction::*;
