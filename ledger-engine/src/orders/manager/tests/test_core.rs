use super::*;
use crate::query::OrderFilter;
use shared::order::OrderEventType;

#[test]
fn test_create_order() {
    let manager = create_test_manager();
    let order = manager
        .create_order(purchase_intent(vec![(10, 4.0, 4.5)]), &admin())
        .unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.fulfillment_applied);
    assert_eq!(order.counterparty_name, "Recambios Norte");
    assert_eq!(order.total, 18.0);

    let stored = manager.query().order(order.id).unwrap().unwrap();
    assert_eq!(stored, order);
}

#[test]
fn test_create_emits_created_event() {
    let manager = create_test_manager();
    let order = manager
        .create_order(expense_intent(100.0, None), &admin())
        .unwrap();

    let events = manager.query().events_for_order(order.id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, OrderEventType::OrderCreated);
    assert_eq!(events[0].operator_name, "Admin");
    assert_eq!(events[0].sequence, 1);
}

#[test]
fn test_creation_touches_no_ledger() {
    let manager = create_test_manager();
    manager
        .create_order(purchase_intent(vec![(10, 100.0, 4.5)]), &admin())
        .unwrap();

    assert_eq!(item_quantity(&manager, 10), 5.0);
    assert_eq!(account_balance(&manager, 1), 10_000.0);
    assert!(manager.query().transactions_for_account(1).unwrap().is_empty());
}

#[test]
fn test_approve_moves_to_approved() {
    let manager = create_test_manager();
    let order = manager
        .create_order(expense_intent(50.0, None), &admin())
        .unwrap();

    let approved = manager.approve(order.id, &approver()).unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);

    // approval still touches no ledger
    assert_eq!(account_balance(&manager, 1), 10_000.0);
}

#[test]
fn test_reject_moves_to_cancelled() {
    let manager = create_test_manager();
    let order = manager
        .create_order(expense_intent(50.0, None), &admin())
        .unwrap();

    let rejected = manager
        .reject(order.id, Some("duplicado".into()), &approver())
        .unwrap();
    assert_eq!(rejected.status, OrderStatus::Cancelled);
    assert!(rejected.is_terminal());

    let events = manager.query().events_for_order(order.id).unwrap();
    assert_eq!(events.last().unwrap().event_type, OrderEventType::OrderRejected);
}

#[test]
fn test_sequence_is_global_and_monotonic() {
    let manager = create_test_manager();
    let a = manager.create_order(expense_intent(10.0, None), &admin()).unwrap();
    let b = manager.create_order(expense_intent(20.0, None), &admin()).unwrap();
    manager.approve(a.id, &admin()).unwrap();
    manager.approve(b.id, &admin()).unwrap();

    let mut sequences: Vec<u64> = manager
        .query()
        .events_for_order(a.id)
        .unwrap()
        .into_iter()
        .chain(manager.query().events_for_order(b.id).unwrap())
        .map(|e| e.sequence)
        .collect();
    sequences.sort_unstable();
    assert_eq!(sequences, vec![1, 2, 3, 4]);
}

#[test]
fn test_event_broadcast() {
    let manager = create_test_manager();
    let mut rx = manager.subscribe();

    let order = manager
        .create_order(expense_intent(10.0, None), &admin())
        .unwrap();
    manager.approve(order.id, &admin()).unwrap();

    let first = rx.try_recv().unwrap();
    assert_eq!(first.event_type, OrderEventType::OrderCreated);
    assert_eq!(first.order_id, order.id);
    let second = rx.try_recv().unwrap();
    assert_eq!(second.event_type, OrderEventType::OrderApproved);
}

#[test]
fn test_order_listing_filters() {
    let manager = create_test_manager();
    let a = manager
        .create_order(purchase_intent(vec![(10, 1.0, 1.0)]), &admin())
        .unwrap();
    let b = manager.create_order(fuel_intent(), &admin()).unwrap();
    manager.approve(b.id, &admin()).unwrap();

    let query = manager.query();
    assert_eq!(query.orders(&OrderFilter::default()).unwrap().len(), 2);

    let pending = query
        .orders(&OrderFilter {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, a.id);

    let fuel = query
        .orders(&OrderFilter {
            kind: Some(OrderKind::FuelSupply),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(fuel.len(), 1);
    assert_eq!(fuel[0].id, b.id);
}

#[test]
fn test_open_orders_shrink_as_orders_close() {
    let manager = create_test_manager();
    let a = manager.create_order(expense_intent(10.0, None), &admin()).unwrap();
    let b = manager.create_order(expense_intent(20.0, None), &admin()).unwrap();
    assert_eq!(manager.query().open_orders().unwrap().len(), 2);

    manager.reject(a.id, None, &admin()).unwrap();
    assert_eq!(manager.query().open_orders().unwrap().len(), 1);

    manager.approve(b.id, &admin()).unwrap();
    manager.receive(b.id, &admin()).unwrap();
    assert!(manager.query().open_orders().unwrap().is_empty());
}

#[test]
fn test_unknown_counterparty_rejected_at_creation() {
    let manager = create_test_manager();
    let intent = OrderIntent::OperationalExpense {
        payee_id: 404,
        description: "Desconocido".into(),
        value: 10.0,
        ledger_code: "625".into(),
        ledger_name: "Seguros".into(),
        target_account_id: None,
        attachments: vec![],
    };
    let err = manager.create_order(intent, &admin()).unwrap_err();
    assert!(err.is_caller_error());
    assert!(manager.query().orders(&OrderFilter::default()).unwrap().is_empty());
}

#[test]
fn test_warm_catalog_cache_counts_items() {
    let manager = create_test_manager();
    assert_eq!(manager.warm_catalog_cache().unwrap(), 2);
}
