//! Transaction model - append-only account log entries

use serde::{Deserialize, Serialize};

/// Transaction direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionDirection {
    Debit,
    Credit,
}

/// Append-only account log entry
///
/// At most one transaction exists per non-null `order_id`; the storage
/// layer enforces this with a unique secondary index, which doubles as the
/// fulfillment idempotency guard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    /// Order that produced this entry; None for direct transactions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    pub account_id: i64,
    pub amount: f64,
    pub direction: TransactionDirection,
    pub description: String,
    /// Set when the account was selected by the default fallback rather
    /// than named on the order; reporting flags these as under-specified
    #[serde(default)]
    pub default_account_used: bool,
    pub timestamp: i64,
}
