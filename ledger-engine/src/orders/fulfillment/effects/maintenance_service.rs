//! Maintenance receipt: vehicle history entry plus optional part consumption

use crate::ledgers::{LedgerError, LedgerResult};
use crate::orders::fulfillment::EffectContext;
use shared::models::MaintenanceRecord;
use shared::order::FulfillmentWarning;
use shared::util::snowflake_id;

use super::SideEffect;

pub struct MaintenanceServiceEffect;

impl SideEffect for MaintenanceServiceEffect {
    /// Consuming more of a part than is in stock is a hard error and aborts
    /// the fulfillment. A consumed part that no longer exists in the catalog
    /// is a warning; the history entry is still written.
    fn apply(&self, ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>> {
        let directive = &ctx.order.directive;
        let vehicle_id = directive
            .vehicle_id
            .ok_or(LedgerError::MissingDirective("vehicle_id"))?;
        let work_description = directive
            .work_description
            .clone()
            .ok_or(LedgerError::MissingDirective("work_description"))?;

        let mut warnings = Vec::new();
        let mut consumed_part_id = directive.consumed_part_id;
        if let Some(part_id) = directive.consumed_part_id {
            let quantity = directive.consumed_part_quantity.unwrap_or(1.0);
            if ctx.inventory.get_txn(ctx.txn, part_id)?.is_some() {
                ctx.inventory.adjust_quantity(ctx.txn, part_id, -quantity)?;
                tracing::debug!(
                    part_id,
                    quantity,
                    order_id = ctx.order.id,
                    "Part consumed for maintenance"
                );
            } else {
                tracing::warn!(part_id, "Consumed part not found in inventory");
                warnings.push(FulfillmentWarning::UnknownLineItem {
                    line_item_id: part_id,
                    description: "consumed part".to_string(),
                });
                consumed_part_id = None;
            }
        }

        let record = MaintenanceRecord {
            id: snowflake_id(),
            vehicle_id,
            order_id: ctx.order.id,
            work_description,
            cost: ctx.order.total,
            odometer_km: directive.odometer_km,
            consumed_part_id,
            consumed_part_quantity: consumed_part_id.and(directive.consumed_part_quantity),
            timestamp: ctx.now,
        };
        ctx.operational.append_maintenance_record(ctx.txn, &record)?;
        Ok(warnings)
    }
}
