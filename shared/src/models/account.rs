//! Financial account model

use serde::{Deserialize, Serialize};

/// Paying account
///
/// Balance is allowed to go negative (overdraft/liability); the engine
/// records the debit and moves on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub balance: f64,
}
