//! Domain errors for order construction and transitions

use shared::order::OrderStatus;
use thiserror::Error;

use crate::orders::gate::TransitionKind;

/// Order domain errors
#[derive(Debug, Error)]
pub enum OrderError {
    /// Malformed order-intent, rejected before creation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// State machine violation, rejected with no side effect
    #[error("Invalid transition: {event} not permitted from {from}")]
    InvalidTransition {
        from: OrderStatus,
        event: TransitionKind,
    },

    /// Operator lacks the authority the gate requires
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),
}
