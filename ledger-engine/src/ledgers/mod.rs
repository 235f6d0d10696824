//! The three subordinate ledger stores
//!
//! Inventory, accounts and operational records are independently
//! addressable, but all live in the one redb database so a fulfillment's
//! write transaction spans whichever of them an order touches. Each store
//! exposes atomic single-entity primitives (adjust, debit, append, mark)
//! rather than read-then-write pairs.

mod accounts;
mod inventory;
mod operational;

pub use accounts::AccountStore;
pub use inventory::InventoryStore;
pub use operational::OperationalStore;

use thiserror::Error;

use crate::storage::StorageError;

/// Ledger store errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Inventory item not found: {0}")]
    ItemNotFound(i64),

    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: i64,
        requested: f64,
        available: f64,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(i64),

    #[error("No account available for default selection")]
    NoDefaultAccount,

    #[error("Payroll record not found: {0}")]
    PayrollRecordNotFound(i64),

    #[error("Payroll record {0} is already paid")]
    PayrollAlreadyPaid(i64),

    #[error("Order is missing directive field: {0}")]
    MissingDirective(&'static str),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
