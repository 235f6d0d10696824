//! Order events - immutable facts recorded after each lifecycle transition

use serde::{Deserialize, Serialize};

use super::types::{FulfillmentWarning, OrderKind};

/// Order event - immutable audit record
///
/// The global `sequence` is the authoritative ordering mechanism; the per
/// order stream replays in sequence order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Global sequence number (for ordering and replay)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: i64,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// Operator who triggered this event
    pub operator_id: i64,
    /// Operator name (snapshot for audit)
    pub operator_name: String,
    /// Event type
    pub event_type: OrderEventType,
    /// Event payload
    pub payload: EventPayload,
}

impl OrderEvent {
    pub fn new(
        sequence: u64,
        order_id: i64,
        operator_id: i64,
        operator_name: String,
        timestamp: i64,
        event_type: OrderEventType,
        payload: EventPayload,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id,
            timestamp,
            operator_id,
            operator_name,
            event_type,
            payload,
        }
    }
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderCreated,
    OrderApproved,
    OrderRejected,
    OrderFulfilled,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderCreated => write!(f, "ORDER_CREATED"),
            OrderEventType::OrderApproved => write!(f, "ORDER_APPROVED"),
            OrderEventType::OrderRejected => write!(f, "ORDER_REJECTED"),
            OrderEventType::OrderFulfilled => write!(f, "ORDER_FULFILLED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderCreated {
        kind: OrderKind,
        counterparty_name: String,
        total: f64,
    },

    OrderApproved {},

    OrderRejected {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    OrderFulfilled {
        /// The single debit transaction created by this receipt
        transaction_id: i64,
        account_id: i64,
        amount: f64,
        /// Set when the paying account was the canonical fallback
        default_account_used: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        warnings: Vec<FulfillmentWarning>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_uuid_and_sequence() {
        let ev = OrderEvent::new(
            7,
            1234,
            1,
            "Marta".into(),
            1_700_000_000_000,
            OrderEventType::OrderApproved,
            EventPayload::OrderApproved {},
        );
        assert_eq!(ev.sequence, 7);
        assert_eq!(ev.order_id, 1234);
        assert!(!ev.event_id.is_empty());
    }

    #[test]
    fn test_fulfilled_payload_serializes_warnings_only_when_present() {
        let ev = OrderEvent::new(
            1,
            1,
            1,
            "Marta".into(),
            0,
            OrderEventType::OrderFulfilled,
            EventPayload::OrderFulfilled {
                transaction_id: 9,
                account_id: 2,
                amount: 50.0,
                default_account_used: true,
                warnings: vec![],
            },
        );
        let json = serde_json::to_string(&ev).unwrap();
        assert!(!json.contains("warnings"));
        assert!(json.contains("\"default_account_used\":true"));
    }
}
