//! Stock receipt: add each line's quantity to the matching inventory item

use crate::ledgers::LedgerResult;
use crate::orders::fulfillment::EffectContext;
use crate::orders::money::round_quantity;
use shared::order::FulfillmentWarning;

use super::SideEffect;

pub struct StockPurchaseEffect;

impl SideEffect for StockPurchaseEffect {
    /// Lines whose item id no longer exists in the catalog are skipped and
    /// reported as warnings; the rest of the receipt still applies. The
    /// item's unit price is refreshed to the purchase price.
    fn apply(&self, ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>> {
        let mut warnings = Vec::new();
        for line in &ctx.order.line_items {
            match ctx.inventory.get_txn(ctx.txn, line.id)? {
                Some(mut item) => {
                    item.quantity = round_quantity(item.quantity + line.quantity);
                    item.unit_price = line.unit_price;
                    ctx.inventory.upsert_item(ctx.txn, &item)?;
                    tracing::debug!(
                        item_id = item.id,
                        received = line.quantity,
                        quantity = item.quantity,
                        "Stock received"
                    );
                }
                None => {
                    tracing::warn!(
                        order_id = ctx.order.id,
                        item_id = line.id,
                        "Received line for unknown inventory item"
                    );
                    warnings.push(FulfillmentWarning::UnknownLineItem {
                        line_item_id: line.id,
                        description: line.description.clone(),
                    });
                }
            }
        }
        Ok(warnings)
    }
}
