//! Order lifecycle module
//!
//! - **factory**: normalizes the six order-intent shapes into the canonical
//!   `Order` record (pure, no side effects)
//! - **gate**: the approval state machine and authority preconditions
//! - **fulfillment**: receipt-time ledger effects, applied exactly once
//! - **manager**: command facade tying the pieces to storage and broadcast
//! - **money**: decimal arithmetic helpers
//!
//! # Control flow
//!
//! ```text
//! OrderIntent → factory → repository (Pending)
//!                 gate: Pending → Approved | Cancelled
//!                 gate: Approved → Received   (triggers fulfillment)
//! ```

pub mod error;
pub mod factory;
pub mod fulfillment;
pub mod gate;
pub mod manager;
pub mod money;

pub use error::OrderError;
pub use fulfillment::FulfillmentOutcome;
pub use manager::OrderManager;
