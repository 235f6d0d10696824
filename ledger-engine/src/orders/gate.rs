//! Approval gate - the order state machine
//!
//! The three-state gate exists so stock/financial consequences never occur
//! without an authorization step distinct from creation. A `Pending` order
//! attempting direct receipt fails loudly; it never auto-approves.
//!
//! ```text
//! Pending ──approve──► Approved ──receive──► Received (terminal)
//!    │
//!    └───reject──► Cancelled (terminal)
//! ```

use serde::{Deserialize, Serialize};

use crate::orders::error::OrderError;
use shared::order::OrderStatus;
use shared::types::Permission;

/// Transition events the gate understands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionKind {
    Approve,
    Reject,
    Receive,
}

impl TransitionKind {
    /// The permission string an operator needs for this transition
    pub fn required_permission(&self) -> &'static str {
        match self {
            TransitionKind::Approve | TransitionKind::Reject => "orders:approve",
            TransitionKind::Receive => "orders:receive",
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Approve => write!(f, "APPROVE"),
            TransitionKind::Reject => write!(f, "REJECT"),
            TransitionKind::Receive => write!(f, "RECEIVE"),
        }
    }
}

/// Pure transition function: the complete state machine in one match.
///
/// Terminal states (`Received`, `Cancelled`) accept nothing.
pub fn next_status(from: OrderStatus, event: TransitionKind) -> Result<OrderStatus, OrderError> {
    match (from, event) {
        (OrderStatus::Pending, TransitionKind::Approve) => Ok(OrderStatus::Approved),
        (OrderStatus::Pending, TransitionKind::Reject) => Ok(OrderStatus::Cancelled),
        (OrderStatus::Approved, TransitionKind::Receive) => Ok(OrderStatus::Received),
        _ => Err(OrderError::InvalidTransition { from, event }),
    }
}

/// Authority precondition: every transition needs its permission
pub fn check_authority(
    permission: &Permission,
    event: TransitionKind,
) -> Result<(), OrderError> {
    let required = event.required_permission();
    if !permission.grants(required) {
        return Err(OrderError::NotAuthorized(format!(
            "{} requires {}",
            event, required
        )));
    }
    Ok(())
}
