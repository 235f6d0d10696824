//! Operational store - fuel logs, maintenance history, payroll records
//!
//! Records here are created (or marked paid) by fulfillment only; HR seeds
//! payroll records ahead of the payroll run that settles them.

use redb::WriteTransaction;

use crate::storage::LedgerStorage;
use shared::models::{FuelLog, MaintenanceRecord, PayrollRecord};

use super::{LedgerError, LedgerResult};

/// Handle over the fuel, maintenance and payroll tables
#[derive(Clone)]
pub struct OperationalStore {
    storage: LedgerStorage,
}

impl OperationalStore {
    pub fn new(storage: LedgerStorage) -> Self {
        Self { storage }
    }

    // ========== Fuel ==========

    pub fn append_fuel_log(&self, txn: &WriteTransaction, log: &FuelLog) -> LedgerResult<()> {
        self.storage.put_fuel_log(txn, log)?;
        Ok(())
    }

    pub fn fuel_history(&self, vehicle_id: i64) -> LedgerResult<Vec<FuelLog>> {
        Ok(self.storage.fuel_logs_for_vehicle(vehicle_id)?)
    }

    // ========== Maintenance ==========

    pub fn append_maintenance_record(
        &self,
        txn: &WriteTransaction,
        record: &MaintenanceRecord,
    ) -> LedgerResult<()> {
        self.storage.put_maintenance_record(txn, record)?;
        Ok(())
    }

    pub fn maintenance_history(&self, vehicle_id: i64) -> LedgerResult<Vec<MaintenanceRecord>> {
        Ok(self.storage.maintenance_for_vehicle(vehicle_id)?)
    }

    // ========== Payroll ==========

    /// Seed or correct a payroll record (HR side, before settlement)
    pub fn upsert_payroll_record(
        &self,
        txn: &WriteTransaction,
        record: &PayrollRecord,
    ) -> LedgerResult<()> {
        self.storage.put_payroll_record(txn, record)?;
        Ok(())
    }

    pub fn get_payroll_record(&self, record_id: i64) -> LedgerResult<Option<PayrollRecord>> {
        Ok(self.storage.get_payroll_record(record_id)?)
    }

    pub fn list_payroll_records(&self) -> LedgerResult<Vec<PayrollRecord>> {
        Ok(self.storage.list_payroll_records()?)
    }

    /// Mark a payroll record paid by the given order.
    ///
    /// Paying an already-paid record is a hard error; the idempotency
    /// guard upstream means a legitimate retry never reaches this point.
    pub fn mark_payroll_paid(
        &self,
        txn: &WriteTransaction,
        record_id: i64,
        order_id: i64,
        timestamp: i64,
    ) -> LedgerResult<PayrollRecord> {
        let mut record = self
            .storage
            .get_payroll_record_txn(txn, record_id)?
            .ok_or(LedgerError::PayrollRecordNotFound(record_id))?;
        if record.paid {
            return Err(LedgerError::PayrollAlreadyPaid(record_id));
        }
        record.paid = true;
        record.paid_by_order_id = Some(order_id);
        record.paid_at = Some(timestamp);
        self.storage.put_payroll_record(txn, &record)?;
        tracing::debug!(record_id, order_id, "Payroll record marked paid");
        Ok(record)
    }
}
