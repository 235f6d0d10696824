//! One side-effect handler per order kind

mod expense;
mod fuel_supply;
mod maintenance_service;
mod payroll_run;
mod stock_purchase;

use crate::ledgers::LedgerResult;
use crate::orders::fulfillment::EffectContext;
use shared::order::{FulfillmentWarning, OrderKind};

pub use expense::ExpenseEffect;
pub use fuel_supply::FuelSupplyEffect;
pub use maintenance_service::MaintenanceServiceEffect;
pub use payroll_run::PayrollRunEffect;
pub use stock_purchase::StockPurchaseEffect;

/// A kind-specific mutation of the subordinate ledgers.
///
/// Implementations must be pure functions of the context: no I/O outside
/// the transaction, no partial writes on error.
pub trait SideEffect: Sync {
    fn apply(&self, ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>>;
}

pub fn for_kind(kind: OrderKind) -> &'static dyn SideEffect {
    match kind {
        OrderKind::StockPurchase => &StockPurchaseEffect,
        OrderKind::MaintenanceService => &MaintenanceServiceEffect,
        OrderKind::OperationalExpense | OrderKind::PersonnelExpense => &ExpenseEffect,
        OrderKind::FuelSupply => &FuelSupplyEffect,
        OrderKind::PayrollRun => &PayrollRunEffect,
    }
}
