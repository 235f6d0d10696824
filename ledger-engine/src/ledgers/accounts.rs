//! Account store - balances and the append-only transaction log
//!
//! Balances are allowed to go negative: the business accepts overdraft
//! risk, so a debit below zero is recorded, not blocked.

use redb::WriteTransaction;

use crate::orders::money::round_money;
use crate::storage::LedgerStorage;
use shared::models::{Account, Transaction, TransactionDirection};
use shared::util::{now_millis, snowflake_id};

use super::{LedgerError, LedgerResult};

/// Handle over the accounts and transactions tables
#[derive(Clone)]
pub struct AccountStore {
    storage: LedgerStorage,
}

impl AccountStore {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    /// Create or replace an account (seeding, direct administration)
    pub fn upsert_account(&self, txn: &WriteTransaction, account: &Account) -> LedgerResult<()> {
        self.storage.put_account(txn, account)?;
        Ok(())
    }

    pub fn get(&self, account_id: i64) -> LedgerResult<Option<Account>> {
        Ok(self.storage.get_account(account_id)?)
    }

    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        Ok(self.storage.list_accounts()?)
    }

    /// Resolve the paying account for an order: the target if it exists,
    /// otherwise the lowest-id account as the canonical default.
    ///
    /// Returns `(account, default_used)`. An empty account set is a hard
    /// error; the caller aborts the whole fulfillment.
    pub fn resolve_account(
        &self,
        txn: &WriteTransaction,
        target_account_id: Option<i64>,
    ) -> LedgerResult<(Account, bool)> {
        if let Some(id) = target_account_id
            && let Some(account) = self.storage.get_account_txn(txn, id)?
        {
            return Ok((account, false));
        }
        if target_account_id.is_some() {
            tracing::warn!(
                target_account_id,
                "Target account does not resolve, falling back to default"
            );
        }
        let account = self
            .storage
            .first_account_txn(txn)?
            .ok_or(LedgerError::NoDefaultAccount)?;
        Ok((account, true))
    }

    /// Atomically debit an account and append the linked transaction.
    ///
    /// The storage layer's `txn_by_order` unique index rejects a second
    /// transaction for the same order.
    pub fn debit(
        &self,
        txn: &WriteTransaction,
        account_id: i64,
        amount: f64,
        order_id: Option<i64>,
        description: String,
        default_account_used: bool,
    ) -> LedgerResult<Transaction> {
        let mut account = self
            .storage
            .get_account_txn(txn, account_id)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        account.balance = round_money(account.balance - amount);
        if account.balance < 0.0 {
            // Overdraft is a business decision, not an error
            tracing::debug!(account_id, balance = account.balance, "Account in overdraft");
        }
        self.storage.put_account(txn, &account)?;

        let transaction = Transaction {
            id: snowflake_id(),
            order_id,
            account_id,
            amount: round_money(amount),
            direction: TransactionDirection::Debit,
            description,
            default_account_used,
            timestamp: now_millis(),
        };
        self.storage.insert_transaction(txn, &transaction)?;
        Ok(transaction)
    }

    /// The transaction created for an order, if any
    pub fn transaction_for_order(&self, order_id: i64) -> LedgerResult<Option<Transaction>> {
        Ok(self.storage.transaction_by_order(order_id)?)
    }

    pub fn transactions_for_account(&self, account_id: i64) -> LedgerResult<Vec<Transaction>> {
        Ok(self.storage.transactions_for_account(account_id)?)
    }
}
