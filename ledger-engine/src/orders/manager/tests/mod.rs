use super::*;
use crate::storage::LedgerStorage;
use shared::models::{Account, InventoryItem, PayrollRecord};
use shared::order::intent::PurchaseLineInput;
use shared::order::{OrderKind, OrderStatus};

mod test_core;

fn create_test_manager() -> OrderManager {
    let storage = LedgerStorage::open_in_memory().unwrap();
    let manager = OrderManager::with_storage(storage);
    seed(&manager);
    manager
}

/// Two accounts (1 is the default), two stocked items, one unpaid payroll
/// record, and the counterparties the intents below reference.
fn seed(manager: &OrderManager) {
    let txn = manager.storage().begin_write().unwrap();
    manager
        .accounts()
        .upsert_account(
            &txn,
            &Account {
                id: 1,
                name: "Caja".into(),
                balance: 10_000.0,
            },
        )
        .unwrap();
    manager
        .accounts()
        .upsert_account(
            &txn,
            &Account {
                id: 2,
                name: "Banco".into(),
                balance: 50_000.0,
            },
        )
        .unwrap();
    manager
        .inventory()
        .upsert_item(
            &txn,
            &InventoryItem {
                id: 10,
                name: "Filtro de aceite".into(),
                unit: "ud".into(),
                quantity: 5.0,
                min_stock: 2.0,
                unit_price: 4.0,
            },
        )
        .unwrap();
    manager
        .inventory()
        .upsert_item(
            &txn,
            &InventoryItem {
                id: 11,
                name: "Aceite 10W40".into(),
                unit: "L".into(),
                quantity: 20.0,
                min_stock: 5.0,
                unit_price: 6.5,
            },
        )
        .unwrap();
    manager
        .operational()
        .upsert_payroll_record(
            &txn,
            &PayrollRecord {
                id: 42,
                employee_id: 3,
                employee_name: "Rosa Jimenez".into(),
                period: "2026-08".into(),
                gross_amount: 2_100.0,
                net_amount: 1_670.0,
                paid: false,
                paid_by_order_id: None,
                paid_at: None,
            },
        )
        .unwrap();
    txn.commit().unwrap();

    manager.register_counterparty(1, "Recambios Norte");
    manager.register_counterparty(2, "Taller Diesel Sur");
    manager.register_counterparty(3, "Rosa Jimenez");
    manager.warm_catalog_cache().unwrap();
}

fn admin() -> Operator {
    Operator {
        id: 1,
        name: "Admin".into(),
        permission: Permission::new("*"),
    }
}

fn clerk() -> Operator {
    Operator {
        id: 2,
        name: "Clerk".into(),
        permission: Permission::new("orders:create"),
    }
}

fn approver() -> Operator {
    Operator {
        id: 3,
        name: "Approver".into(),
        permission: Permission::new("orders:approve"),
    }
}

fn receiver() -> Operator {
    Operator {
        id: 4,
        name: "Receiver".into(),
        permission: Permission::new("orders:receive"),
    }
}

fn purchase_intent(lines: Vec<(i64, f64, f64)>) -> OrderIntent {
    OrderIntent::StockPurchase {
        supplier_id: 1,
        lines: lines
            .into_iter()
            .map(|(item_id, quantity, unit_price)| PurchaseLineInput {
                item_id,
                quantity,
                unit_price,
            })
            .collect(),
        shipping_cost: 0.0,
        ledger_code: "600".into(),
        ledger_name: "Compras".into(),
        target_account_id: None,
        attachments: vec![],
    }
}

fn expense_intent(value: f64, target_account_id: Option<i64>) -> OrderIntent {
    OrderIntent::OperationalExpense {
        payee_id: 2,
        description: "Seguro de flota".into(),
        value,
        ledger_code: "625".into(),
        ledger_name: "Primas de seguros".into(),
        target_account_id,
        attachments: vec![],
    }
}

fn fuel_intent() -> OrderIntent {
    OrderIntent::FuelSupply {
        station_id: 2,
        vehicle_id: 9,
        liters: 200.0,
        price_per_liter: 1.5,
        odometer_km: Some(90_100.0),
        ledger_code: "628".into(),
        ledger_name: "Combustible".into(),
        target_account_id: Some(2),
        attachments: vec![],
    }
}

fn maintenance_intent(part: Option<(i64, f64)>) -> OrderIntent {
    OrderIntent::MaintenanceService {
        workshop_id: 2,
        vehicle_id: 7,
        work_description: "Cambio de filtro".into(),
        value: 250.0,
        odometer_km: Some(182_000.0),
        consumed_part_id: part.map(|(id, _)| id),
        consumed_part_quantity: part.map(|(_, qty)| qty),
        ledger_code: "622".into(),
        ledger_name: "Reparaciones".into(),
        target_account_id: None,
        attachments: vec![],
    }
}

fn payroll_intent() -> OrderIntent {
    OrderIntent::PayrollRun {
        employee_id: 3,
        payroll_record_id: 42,
        value: 1_670.0,
        ledger_code: "640".into(),
        ledger_name: "Sueldos y salarios".into(),
        target_account_id: None,
        attachments: vec![],
    }
}

/// Create and approve an order, returning its id
fn approved_order(manager: &OrderManager, intent: OrderIntent) -> i64 {
    let order = manager.create_order(intent, &admin()).unwrap();
    manager.approve(order.id, &admin()).unwrap();
    order.id
}

fn account_balance(manager: &OrderManager, account_id: i64) -> f64 {
    manager.accounts().get(account_id).unwrap().unwrap().balance
}

fn item_quantity(manager: &OrderManager, item_id: i64) -> f64 {
    manager.inventory().get(item_id).unwrap().unwrap().quantity
}
