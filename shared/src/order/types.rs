//! Canonical order record shared across the engine

use serde::{Deserialize, Serialize};

// ============================================================================
// Status and Kind
// ============================================================================

/// Order lifecycle status
///
/// `Received` and `Cancelled` are terminal; the approval gate rejects every
/// transition out of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Received,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "PENDING"),
            OrderStatus::Approved => write!(f, "APPROVED"),
            OrderStatus::Received => write!(f, "RECEIVED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Order kind - determines which ledger stores fulfillment touches
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    /// Goods into inventory
    #[default]
    StockPurchase,
    /// Vehicle service; may consume a stocked part
    MaintenanceService,
    /// General operating expense, financial effect only
    OperationalExpense,
    /// Personnel-related expense, financial effect only
    PersonnelExpense,
    /// Fuel delivery; creates a fuel log entry
    FuelSupply,
    /// Salary payout; marks the payroll record paid
    PayrollRun,
}

impl std::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderKind::StockPurchase => write!(f, "STOCK_PURCHASE"),
            OrderKind::MaintenanceService => write!(f, "MAINTENANCE_SERVICE"),
            OrderKind::OperationalExpense => write!(f, "OPERATIONAL_EXPENSE"),
            OrderKind::PersonnelExpense => write!(f, "PERSONNEL_EXPENSE"),
            OrderKind::FuelSupply => write!(f, "FUEL_SUPPLY"),
            OrderKind::PayrollRun => write!(f, "PAYROLL_RUN"),
        }
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// Order line item
///
/// Quantities are fractional (liters, kilograms). `line_total` is computed
/// by the engine, never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Item ID; for StockPurchase lines this references the inventory catalog
    pub id: i64,
    pub description: String,
    pub quantity: f64,
    /// Unit of measure snapshot ("L", "kg", "ud")
    pub unit: String,
    pub unit_price: f64,
    /// Line total (computed: unit_price * quantity, 2dp)
    #[serde(default)]
    pub line_total: f64,
}

/// Opaque reference to a supporting document; carried, never interpreted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

// ============================================================================
// Order
// ============================================================================

/// Kind-specific fulfillment payload carried on the canonical order
///
/// Set by the factory from the intent; read only by the fulfillment
/// coordinator's kind dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FulfillmentDirective {
    /// Vehicle under which a maintenance/fuel record is filed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<i64>,
    /// Odometer reading snapshot for operational records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer_km: Option<f64>,
    /// Inventory part consumed by a maintenance service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_part_id: Option<i64>,
    /// Quantity of the consumed part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_part_quantity: Option<f64>,
    /// Fuel volume in liters for fuel log entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_liters: Option<f64>,
    /// Payroll record settled by a payroll run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payroll_record_id: Option<i64>,
    /// Free-form work description for maintenance records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_description: Option<String>,
}

/// Canonical order record - the unifying entity
///
/// Built once by the factory, transitions monotonically through the state
/// machine, never deleted except by explicit cancellation before receipt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Order {
    /// Snowflake ID (unique, creation-time ordered)
    pub id: i64,
    pub kind: OrderKind,
    pub status: OrderStatus,
    /// Supplier, employee or station being paid
    pub counterparty_id: i64,
    /// Counterparty display name snapshot
    pub counterparty_name: String,
    /// Creation timestamp (Unix milliseconds)
    pub issued_at: i64,
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    /// Always subtotal + shipping_cost, recomputed, never edited
    pub total: f64,
    /// Chart-of-accounts classification, set before approval
    pub ledger_code: String,
    pub ledger_name: String,
    /// Paying account; fulfillment falls back to the lowest-id account when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_account_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<DocumentRef>,
    /// True exactly once receipt side effects have been applied
    #[serde(default)]
    pub fulfillment_applied: bool,
    /// Kind-specific payload for the fulfillment dispatch
    #[serde(default)]
    pub directive: FulfillmentDirective,
}

impl Order {
    /// Whether the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, OrderStatus::Received | OrderStatus::Cancelled)
    }
}

// ============================================================================
// Fulfillment outcome
// ============================================================================

/// Non-fatal condition recorded during fulfillment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentWarning {
    /// A purchased line referenced an item not yet in the catalog
    UnknownLineItem { line_item_id: i64, description: String },
}
