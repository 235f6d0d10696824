//! Canonical order model and audit event stream
//!
//! All six order kinds share the one `Order` schema; the kind-specific
//! shape lives in `OrderIntent` and is normalized away by the factory
//! before an order enters the repository.

pub mod event;
pub mod intent;
pub mod types;

pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use intent::OrderIntent;
pub use types::{
    DocumentRef, FulfillmentDirective, FulfillmentWarning, LineItem, Order, OrderKind, OrderStatus,
};
