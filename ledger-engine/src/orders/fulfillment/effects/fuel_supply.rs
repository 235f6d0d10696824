//! Fuel receipt: append an entry to the vehicle's fuel log

use crate::ledgers::{LedgerError, LedgerResult};
use crate::orders::fulfillment::EffectContext;
use shared::models::FuelLog;
use shared::order::FulfillmentWarning;
use shared::util::snowflake_id;

use super::SideEffect;

pub struct FuelSupplyEffect;

impl SideEffect for FuelSupplyEffect {
    fn apply(&self, ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>> {
        let directive = &ctx.order.directive;
        let vehicle_id = directive
            .vehicle_id
            .ok_or(LedgerError::MissingDirective("vehicle_id"))?;
        let liters = directive
            .fuel_liters
            .ok_or(LedgerError::MissingDirective("fuel_liters"))?;
        let price_per_liter = ctx
            .order
            .line_items
            .first()
            .map(|line| line.unit_price)
            .unwrap_or(0.0);

        let log = FuelLog {
            id: snowflake_id(),
            vehicle_id,
            order_id: ctx.order.id,
            liters,
            price_per_liter,
            total_cost: ctx.order.total,
            odometer_km: directive.odometer_km,
            timestamp: ctx.now,
        };
        ctx.operational.append_fuel_log(ctx.txn, &log)?;
        tracing::debug!(vehicle_id, liters, order_id = ctx.order.id, "Fuel logged");
        Ok(Vec::new())
    }
}
