//! Operational record models - fuel logs, maintenance history, payroll
//!
//! Once an order exists for one of these, the record is created (or marked
//! paid) only by fulfillment, never directly.

use serde::{Deserialize, Serialize};

/// Fuel log entry created by a fulfilled fuel supply order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelLog {
    pub id: i64,
    pub vehicle_id: i64,
    /// Order that produced this entry
    pub order_id: i64,
    pub liters: f64,
    pub price_per_liter: f64,
    pub total_cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer_km: Option<f64>,
    pub timestamp: i64,
}

/// Maintenance history entry created by a fulfilled maintenance order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub vehicle_id: i64,
    pub order_id: i64,
    pub work_description: String,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odometer_km: Option<f64>,
    /// Part consumed from own stock, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_part_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_part_quantity: Option<f64>,
    pub timestamp: i64,
}

/// Payroll record settled by a payroll run order
///
/// The record itself predates the order (HR creates it); fulfillment only
/// flips `paid` and stamps the settling order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayrollRecord {
    pub id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    /// Period label ("2026-08")
    pub period: String,
    pub gross_amount: f64,
    pub net_amount: f64,
    #[serde(default)]
    pub paid: bool,
    /// Order that settled this record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_by_order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
}
