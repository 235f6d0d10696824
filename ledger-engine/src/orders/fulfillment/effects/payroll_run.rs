//! Payroll receipt: mark the linked payroll record paid

use crate::ledgers::{LedgerError, LedgerResult};
use crate::orders::fulfillment::EffectContext;
use shared::order::FulfillmentWarning;

use super::SideEffect;

pub struct PayrollRunEffect;

impl SideEffect for PayrollRunEffect {
    /// A missing or already-paid record is a hard error; paying the same
    /// record twice through two different orders must not happen silently.
    fn apply(&self, ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>> {
        let record_id = ctx
            .order
            .directive
            .payroll_record_id
            .ok_or(LedgerError::MissingDirective("payroll_record_id"))?;
        ctx.operational
            .mark_payroll_paid(ctx.txn, record_id, ctx.order.id, ctx.now)?;
        Ok(Vec::new())
    }
}
