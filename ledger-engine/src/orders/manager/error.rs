use thiserror::Error;

use crate::ledgers::LedgerError;
use crate::orders::error::OrderError;
use crate::storage::StorageError;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Recorded fulfillment has no transaction for order {0}")]
    MissingFulfillmentRecord(i64),
}

impl ManagerError {
    /// Validation and authorization failures are caller errors; everything
    /// else indicates a ledger or storage problem worth alerting on.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ManagerError::Order(
                OrderError::Validation(_)
                    | OrderError::InvalidTransition { .. }
                    | OrderError::NotAuthorized(_)
                    | OrderError::OrderNotFound(_)
            )
        )
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;
