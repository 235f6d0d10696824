//! Order intents - the six heterogeneous input shapes
//!
//! Callers describe what they want to pay for in whichever shape is natural
//! (a multi-line purchase cart, a single service, a payroll run); the
//! factory normalizes all of them into the one canonical `Order` schema so
//! no downstream component except the fulfillment dispatch branches on kind.

use serde::{Deserialize, Serialize};

use super::types::DocumentRef;

/// One line of a stock purchase cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseLineInput {
    /// Inventory catalog item ID
    pub item_id: i64,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Order intent - closed set of tagged variants, normalized by the factory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderIntent {
    /// Goods purchase with a real multi-item cart
    StockPurchase {
        supplier_id: i64,
        lines: Vec<PurchaseLineInput>,
        #[serde(default)]
        shipping_cost: f64,
        ledger_code: String,
        ledger_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_account_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<DocumentRef>,
    },

    /// Vehicle service billed as one value; may consume a stocked part
    MaintenanceService {
        workshop_id: i64,
        vehicle_id: i64,
        work_description: String,
        value: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        odometer_km: Option<f64>,
        /// Part taken from own stock during the service
        #[serde(skip_serializing_if = "Option::is_none")]
        consumed_part_id: Option<i64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        consumed_part_quantity: Option<f64>,
        ledger_code: String,
        ledger_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_account_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<DocumentRef>,
    },

    /// General operating expense (tolls, insurance, rent)
    OperationalExpense {
        payee_id: i64,
        description: String,
        value: f64,
        ledger_code: String,
        ledger_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_account_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<DocumentRef>,
    },

    /// Personnel expense (training, per-diem, medical checks)
    PersonnelExpense {
        employee_id: i64,
        description: String,
        value: f64,
        ledger_code: String,
        ledger_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_account_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<DocumentRef>,
    },

    /// Fuel delivery for a vehicle, logged by liters
    FuelSupply {
        station_id: i64,
        vehicle_id: i64,
        liters: f64,
        price_per_liter: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        odometer_km: Option<f64>,
        ledger_code: String,
        ledger_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_account_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<DocumentRef>,
    },

    /// Salary payout settling an existing payroll record
    PayrollRun {
        employee_id: i64,
        payroll_record_id: i64,
        value: f64,
        ledger_code: String,
        ledger_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_account_id: Option<i64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<DocumentRef>,
    },
}

impl OrderIntent {
    /// The counterparty being paid, whichever field carries it
    pub fn counterparty_id(&self) -> i64 {
        match self {
            OrderIntent::StockPurchase { supplier_id, .. } => *supplier_id,
            OrderIntent::MaintenanceService { workshop_id, .. } => *workshop_id,
            OrderIntent::OperationalExpense { payee_id, .. } => *payee_id,
            OrderIntent::PersonnelExpense { employee_id, .. } => *employee_id,
            OrderIntent::FuelSupply { station_id, .. } => *station_id,
            OrderIntent::PayrollRun { employee_id, .. } => *employee_id,
        }
    }
}
