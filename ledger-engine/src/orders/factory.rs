//! Order factory - normalizes the six intent shapes into one canonical record
//!
//! Pure construction: no ledger is touched here. Non-cart kinds (services,
//! expenses, payroll) become a single synthetic line item carrying the
//! whole value, so every downstream component sees the same schema.

use crate::orders::error::OrderError;
use crate::orders::money;
use crate::refdata::ReferenceData;
use shared::order::intent::PurchaseLineInput;
use shared::order::{
    DocumentRef, FulfillmentDirective, LineItem, Order, OrderIntent, OrderKind, OrderStatus,
};
use shared::util::{now_millis, snowflake_id};

/// Build a canonical `Pending` order from an intent.
///
/// Validation failures reject the intent before anything is created.
pub fn build(intent: OrderIntent, refdata: &ReferenceData) -> Result<Order, OrderError> {
    let counterparty_id = intent.counterparty_id();
    if counterparty_id <= 0 {
        return Err(OrderError::Validation(
            "counterparty is mandatory".to_string(),
        ));
    }
    let counterparty_name = refdata
        .counterparty_name(counterparty_id)
        .ok_or_else(|| {
            OrderError::Validation(format!("unknown counterparty: {}", counterparty_id))
        })?
        .to_string();

    let mut order = match intent {
        OrderIntent::StockPurchase {
            lines,
            shipping_cost,
            ledger_code,
            ledger_name,
            target_account_id,
            attachments,
            ..
        } => {
            if lines.is_empty() {
                return Err(OrderError::Validation(
                    "order must have at least one line item".to_string(),
                ));
            }
            money::validate_shipping(shipping_cost)?;
            let line_items = lines
                .iter()
                .map(|line| purchase_line(line, refdata))
                .collect::<Result<Vec<_>, _>>()?;
            base_order(
                OrderKind::StockPurchase,
                counterparty_id,
                counterparty_name,
                line_items,
                shipping_cost,
                ledger_code,
                ledger_name,
                target_account_id,
                attachments,
                FulfillmentDirective::default(),
            )?
        }

        OrderIntent::MaintenanceService {
            vehicle_id,
            work_description,
            value,
            odometer_km,
            consumed_part_id,
            consumed_part_quantity,
            ledger_code,
            ledger_name,
            target_account_id,
            attachments,
            ..
        } => {
            money::validate_value(value)?;
            if work_description.trim().is_empty() {
                return Err(OrderError::Validation(
                    "work description is mandatory".to_string(),
                ));
            }
            if let Some(qty) = consumed_part_quantity {
                if consumed_part_id.is_none() {
                    return Err(OrderError::Validation(
                        "consumed part quantity given without a part".to_string(),
                    ));
                }
                money::validate_line(qty, 0.0)?;
            }
            let directive = FulfillmentDirective {
                vehicle_id: Some(vehicle_id),
                odometer_km,
                consumed_part_id,
                consumed_part_quantity,
                work_description: Some(work_description.clone()),
                ..Default::default()
            };
            base_order(
                OrderKind::MaintenanceService,
                counterparty_id,
                counterparty_name,
                vec![synthetic_line(work_description, value)],
                0.0,
                ledger_code,
                ledger_name,
                target_account_id,
                attachments,
                directive,
            )?
        }

        OrderIntent::OperationalExpense {
            description,
            value,
            ledger_code,
            ledger_name,
            target_account_id,
            attachments,
            ..
        } => {
            money::validate_value(value)?;
            base_order(
                OrderKind::OperationalExpense,
                counterparty_id,
                counterparty_name,
                vec![synthetic_line(description, value)],
                0.0,
                ledger_code,
                ledger_name,
                target_account_id,
                attachments,
                FulfillmentDirective::default(),
            )?
        }

        OrderIntent::PersonnelExpense {
            description,
            value,
            ledger_code,
            ledger_name,
            target_account_id,
            attachments,
            ..
        } => {
            money::validate_value(value)?;
            base_order(
                OrderKind::PersonnelExpense,
                counterparty_id,
                counterparty_name,
                vec![synthetic_line(description, value)],
                0.0,
                ledger_code,
                ledger_name,
                target_account_id,
                attachments,
                FulfillmentDirective::default(),
            )?
        }

        OrderIntent::FuelSupply {
            vehicle_id,
            liters,
            price_per_liter,
            odometer_km,
            ledger_code,
            ledger_name,
            target_account_id,
            attachments,
            ..
        } => {
            money::validate_line(liters, price_per_liter)?;
            let directive = FulfillmentDirective {
                vehicle_id: Some(vehicle_id),
                odometer_km,
                fuel_liters: Some(liters),
                ..Default::default()
            };
            let line = LineItem {
                id: snowflake_id(),
                description: "Combustible".to_string(),
                quantity: liters,
                unit: "L".to_string(),
                unit_price: price_per_liter,
                line_total: 0.0,
            };
            base_order(
                OrderKind::FuelSupply,
                counterparty_id,
                counterparty_name,
                vec![line],
                0.0,
                ledger_code,
                ledger_name,
                target_account_id,
                attachments,
                directive,
            )?
        }

        OrderIntent::PayrollRun {
            payroll_record_id,
            value,
            ledger_code,
            ledger_name,
            target_account_id,
            attachments,
            ..
        } => {
            money::validate_value(value)?;
            let directive = FulfillmentDirective {
                payroll_record_id: Some(payroll_record_id),
                ..Default::default()
            };
            let description = format!("Nomina {}", counterparty_name);
            base_order(
                OrderKind::PayrollRun,
                counterparty_id,
                counterparty_name,
                vec![synthetic_line(description, value)],
                0.0,
                ledger_code,
                ledger_name,
                target_account_id,
                attachments,
                directive,
            )?
        }
    };

    money::recalculate_totals(&mut order);
    tracing::debug!(
        order_id = order.id,
        kind = %order.kind,
        total = order.total,
        "Order built"
    );
    Ok(order)
}

/// Denormalize one purchase cart line against the item master.
/// Items not yet in the catalog keep a placeholder description; fulfillment
/// records the gap as a warning, not a failure.
fn purchase_line(line: &PurchaseLineInput, refdata: &ReferenceData) -> Result<LineItem, OrderError> {
    money::validate_line(line.quantity, line.unit_price)?;
    let (description, unit) = match refdata.item(line.item_id) {
        Some(meta) => (meta.name.clone(), meta.unit.clone()),
        None => (format!("Articulo {}", line.item_id), "ud".to_string()),
    };
    Ok(LineItem {
        id: line.item_id,
        description,
        quantity: line.quantity,
        unit,
        unit_price: line.unit_price,
        line_total: 0.0,
    })
}

/// One synthetic line carrying the whole value of a non-cart order
fn synthetic_line(description: String, value: f64) -> LineItem {
    LineItem {
        id: snowflake_id(),
        description,
        quantity: 1.0,
        unit: "ud".to_string(),
        unit_price: value,
        line_total: 0.0,
    }
}

#[allow(clippy::too_many_arguments)]
fn base_order(
    kind: OrderKind,
    counterparty_id: i64,
    counterparty_name: String,
    line_items: Vec<LineItem>,
    shipping_cost: f64,
    ledger_code: String,
    ledger_name: String,
    target_account_id: Option<i64>,
    attachments: Vec<DocumentRef>,
    directive: FulfillmentDirective,
) -> Result<Order, OrderError> {
    if ledger_code.trim().is_empty() {
        return Err(OrderError::Validation(
            "ledger code must be set before approval".to_string(),
        ));
    }
    Ok(Order {
        id: snowflake_id(),
        kind,
        status: OrderStatus::Pending,
        counterparty_id,
        counterparty_name,
        issued_at: now_millis(),
        line_items,
        subtotal: 0.0,
        shipping_cost,
        total: 0.0,
        ledger_code,
        ledger_name,
        target_account_id,
        attachments,
        fulfillment_applied: false,
        directive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refdata() -> ReferenceData {
        let mut rd = ReferenceData::new();
        rd.insert_counterparty(1, "Recambios Norte");
        rd.insert_counterparty(2, "Taller Diesel Sur");
        rd.insert_counterparty(3, "Rosa Jimenez");
        rd.insert_item(10, "Filtro de aceite", "ud");
        rd
    }

    fn purchase_intent(lines: Vec<PurchaseLineInput>) -> OrderIntent {
        OrderIntent::StockPurchase {
            supplier_id: 1,
            lines,
            shipping_cost: 0.0,
            ledger_code: "600".into(),
            ledger_name: "Compras".into(),
            target_account_id: None,
            attachments: vec![],
        }
    }

    #[test]
    fn test_stock_purchase_builds_pending_order() {
        let order = build(
            purchase_intent(vec![PurchaseLineInput {
                item_id: 10,
                quantity: 10.0,
                unit_price: 5.0,
            }]),
            &refdata(),
        )
        .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.kind, OrderKind::StockPurchase);
        assert!(!order.fulfillment_applied);
        assert_eq!(order.counterparty_name, "Recambios Norte");
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].description, "Filtro de aceite");
        assert_eq!(order.subtotal, 50.0);
        assert_eq!(order.total, 50.0);
    }

    #[test]
    fn test_unknown_catalog_item_gets_placeholder() {
        let order = build(
            purchase_intent(vec![PurchaseLineInput {
                item_id: 999,
                quantity: 1.0,
                unit_price: 2.0,
            }]),
            &refdata(),
        )
        .unwrap();
        assert_eq!(order.line_items[0].description, "Articulo 999");
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = build(purchase_intent(vec![]), &refdata()).unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }

    #[test]
    fn test_unknown_counterparty_rejected() {
        let intent = OrderIntent::StockPurchase {
            supplier_id: 404,
            lines: vec![PurchaseLineInput {
                item_id: 10,
                quantity: 1.0,
                unit_price: 1.0,
            }],
            shipping_cost: 0.0,
            ledger_code: "600".into(),
            ledger_name: "Compras".into(),
            target_account_id: None,
            attachments: vec![],
        };
        assert!(matches!(
            build(intent, &refdata()).unwrap_err(),
            OrderError::Validation(_)
        ));
    }

    #[test]
    fn test_shipping_included_in_total_only() {
        let intent = OrderIntent::StockPurchase {
            supplier_id: 1,
            lines: vec![PurchaseLineInput {
                item_id: 10,
                quantity: 2.0,
                unit_price: 10.0,
            }],
            shipping_cost: 7.5,
            ledger_code: "600".into(),
            ledger_name: "Compras".into(),
            target_account_id: None,
            attachments: vec![],
        };
        let order = build(intent, &refdata()).unwrap();
        assert_eq!(order.subtotal, 20.0);
        assert_eq!(order.total, 27.5);
    }

    #[test]
    fn test_maintenance_service_synthesizes_one_line() {
        let intent = OrderIntent::MaintenanceService {
            workshop_id: 2,
            vehicle_id: 7,
            work_description: "Cambio de correa".into(),
            value: 320.0,
            odometer_km: Some(182_000.0),
            consumed_part_id: Some(10),
            consumed_part_quantity: Some(1.0),
            ledger_code: "622".into(),
            ledger_name: "Reparaciones".into(),
            target_account_id: None,
            attachments: vec![],
        };
        let order = build(intent, &refdata()).unwrap();
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].quantity, 1.0);
        assert_eq!(order.total, 320.0);
        assert_eq!(order.directive.vehicle_id, Some(7));
        assert_eq!(order.directive.consumed_part_id, Some(10));
    }

    #[test]
    fn test_part_quantity_without_part_rejected() {
        let intent = OrderIntent::MaintenanceService {
            workshop_id: 2,
            vehicle_id: 7,
            work_description: "Revision".into(),
            value: 100.0,
            odometer_km: None,
            consumed_part_id: None,
            consumed_part_quantity: Some(2.0),
            ledger_code: "622".into(),
            ledger_name: "Reparaciones".into(),
            target_account_id: None,
            attachments: vec![],
        };
        assert!(matches!(
            build(intent, &refdata()).unwrap_err(),
            OrderError::Validation(_)
        ));
    }

    #[test]
    fn test_expense_kinds_require_positive_value() {
        for value in [0.0, -10.0] {
            let intent = OrderIntent::PersonnelExpense {
                employee_id: 3,
                description: "Dietas".into(),
                value,
                ledger_code: "649".into(),
                ledger_name: "Gastos de personal".into(),
                target_account_id: None,
                attachments: vec![],
            };
            assert!(matches!(
                build(intent, &refdata()).unwrap_err(),
                OrderError::Validation(_)
            ));
        }
    }

    #[test]
    fn test_fuel_supply_line_carries_liters() {
        let intent = OrderIntent::FuelSupply {
            station_id: 2,
            vehicle_id: 9,
            liters: 250.5,
            price_per_liter: 1.42,
            odometer_km: Some(90_100.0),
            ledger_code: "628".into(),
            ledger_name: "Combustible".into(),
            target_account_id: Some(4),
            attachments: vec![],
        };
        let order = build(intent, &refdata()).unwrap();
        assert_eq!(order.kind, OrderKind::FuelSupply);
        assert_eq!(order.line_items[0].quantity, 250.5);
        assert_eq!(order.line_items[0].unit, "L");
        assert_eq!(order.total, 355.71);
        assert_eq!(order.directive.fuel_liters, Some(250.5));
        assert_eq!(order.target_account_id, Some(4));
    }

    #[test]
    fn test_payroll_run_links_record() {
        let intent = OrderIntent::PayrollRun {
            employee_id: 3,
            payroll_record_id: 42,
            value: 1670.0,
            ledger_code: "640".into(),
            ledger_name: "Sueldos y salarios".into(),
            target_account_id: None,
            attachments: vec![],
        };
        let order = build(intent, &refdata()).unwrap();
        assert_eq!(order.kind, OrderKind::PayrollRun);
        assert_eq!(order.directive.payroll_record_id, Some(42));
        assert_eq!(order.total, 1670.0);
    }

    #[test]
    fn test_missing_ledger_code_rejected() {
        let intent = OrderIntent::OperationalExpense {
            payee_id: 1,
            description: "Seguro".into(),
            value: 900.0,
            ledger_code: "  ".into(),
            ledger_name: "".into(),
            target_account_id: None,
            attachments: vec![],
        };
        assert!(matches!(
            build(intent, &refdata()).unwrap_err(),
            OrderError::Validation(_)
        ));
    }

    #[test]
    fn test_order_ids_unique_across_builds() {
        let rd = refdata();
        let a = build(
            purchase_intent(vec![PurchaseLineInput {
                item_id: 10,
                quantity: 1.0,
                unit_price: 1.0,
            }]),
            &rd,
        )
        .unwrap();
        let b = build(
            purchase_intent(vec![PurchaseLineInput {
                item_id: 10,
                quantity: 1.0,
                unit_price: 1.0,
            }]),
            &rd,
        )
        .unwrap();
        assert_ne!(a.id, b.id);
    }
}
