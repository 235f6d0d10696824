//! Inventory item model

use serde::{Deserialize, Serialize};

/// Stocked item
///
/// `quantity` is mutated only by direct stock-count edits (outside the
/// engine) or by fulfillment applying a stock purchase or part consumption.
/// It never goes negative as the result of an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    /// Unit of measure ("L", "kg", "ud")
    pub unit: String,
    pub quantity: f64,
    /// Reorder threshold for the low-stock projection
    #[serde(default)]
    pub min_stock: f64,
    pub unit_price: f64,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_stock
    }
}
