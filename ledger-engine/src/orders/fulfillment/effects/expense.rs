//! Plain expenses: the account debit is the whole effect

use crate::ledgers::LedgerResult;
use crate::orders::fulfillment::EffectContext;
use shared::order::FulfillmentWarning;

use super::SideEffect;

/// Operational and personnel expenses touch no subordinate ledger.
pub struct ExpenseEffect;

impl SideEffect for ExpenseEffect {
    fn apply(&self, _ctx: &EffectContext<'_>) -> LedgerResult<Vec<FulfillmentWarning>> {
        Ok(Vec::new())
    }
}
