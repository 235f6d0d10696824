//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64` in serialized records; every computation
//! goes through `Decimal` and is rounded to 2 decimal places half-up
//! before conversion back.

use rust_decimal::prelude::*;

use crate::orders::error::OrderError;
use shared::order::Order;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Quantities keep more precision than money (liters to 3 dp)
const QUANTITY_DECIMAL_PLACES: u32 = 3;

/// Tolerance below which a computed quantity counts as zero
pub const QUANTITY_TOLERANCE: f64 = 0.0005;

/// Maximum allowed unit price (1,000,000)
const MAX_UNIT_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: f64 = 1_000_000.0;
/// Maximum allowed order value (10,000,000)
const MAX_ORDER_VALUE: f64 = 10_000_000.0;

/// Convert f64 to Decimal for precise arithmetic
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round a monetary f64 to 2 decimal places
pub fn round_money(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Round a quantity to 3 decimal places
pub fn round_quantity(value: f64) -> f64 {
    to_decimal(value)
        .round_dp_with_strategy(QUANTITY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Precise line total: quantity * unit_price, 2 dp
pub fn line_total(quantity: f64, unit_price: f64) -> f64 {
    to_f64(to_decimal(quantity) * to_decimal(unit_price))
}

/// Recompute every line total, the subtotal and the order total.
///
/// `total` is always `subtotal + shipping_cost`; nothing else ever writes
/// these fields.
pub fn recalculate_totals(order: &mut Order) {
    let mut subtotal = Decimal::ZERO;
    for item in &mut order.line_items {
        let line = to_decimal(item.quantity) * to_decimal(item.unit_price);
        item.line_total = to_f64(line);
        subtotal += line;
    }
    order.subtotal = to_f64(subtotal);
    order.total = to_f64(subtotal + to_decimal(order.shipping_cost));
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), OrderError> {
    if !value.is_finite() {
        return Err(OrderError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate one order line before construction
pub fn validate_line(quantity: f64, unit_price: f64) -> Result<(), OrderError> {
    require_finite(quantity, "quantity")?;
    if quantity <= 0.0 {
        return Err(OrderError::Validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }

    require_finite(unit_price, "unit_price")?;
    if unit_price < 0.0 {
        return Err(OrderError::Validation(format!(
            "unit_price must be non-negative, got {}",
            unit_price
        )));
    }
    if unit_price > MAX_UNIT_PRICE {
        return Err(OrderError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_UNIT_PRICE, unit_price
        )));
    }
    Ok(())
}

/// Validate a single-value order amount (services, expenses, payroll);
/// these kinds require a strictly positive value
pub fn validate_value(value: f64) -> Result<(), OrderError> {
    require_finite(value, "value")?;
    if value <= 0.0 {
        return Err(OrderError::Validation(format!(
            "value must be positive, got {}",
            value
        )));
    }
    if value > MAX_ORDER_VALUE {
        return Err(OrderError::Validation(format!(
            "value exceeds maximum allowed ({}), got {}",
            MAX_ORDER_VALUE, value
        )));
    }
    Ok(())
}

/// Validate a shipping cost (zero is fine, negative is not)
pub fn validate_shipping(shipping_cost: f64) -> Result<(), OrderError> {
    require_finite(shipping_cost, "shipping_cost")?;
    if shipping_cost < 0.0 {
        return Err(OrderError::Validation(format!(
            "shipping_cost must be non-negative, got {}",
            shipping_cost
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{FulfillmentDirective, LineItem, OrderKind, OrderStatus};

    fn order_with_lines(lines: Vec<LineItem>, shipping: f64) -> Order {
        Order {
            id: 1,
            kind: OrderKind::StockPurchase,
            status: OrderStatus::Pending,
            counterparty_id: 1,
            counterparty_name: "x".into(),
            issued_at: 0,
            line_items: lines,
            subtotal: 0.0,
            shipping_cost: shipping,
            total: 0.0,
            ledger_code: "600".into(),
            ledger_name: "Compras".into(),
            target_account_id: None,
            attachments: vec![],
            fulfillment_applied: false,
            directive: FulfillmentDirective::default(),
        }
    }

    fn line(quantity: f64, unit_price: f64) -> LineItem {
        LineItem {
            id: 1,
            description: "x".into(),
            quantity,
            unit: "ud".into(),
            unit_price,
            line_total: 0.0,
        }
    }

    #[test]
    fn test_line_total_precision() {
        // 0.1 * 3 in binary floats is 0.30000000000000004
        assert_eq!(line_total(3.0, 0.1), 0.3);
        assert_eq!(line_total(10.0, 5.0), 50.0);
    }

    #[test]
    fn test_recalculate_totals_sums_lines_plus_shipping() {
        let mut order = order_with_lines(vec![line(10.0, 5.0), line(2.0, 1.25)], 4.5);
        recalculate_totals(&mut order);
        assert_eq!(order.line_items[0].line_total, 50.0);
        assert_eq!(order.line_items[1].line_total, 2.5);
        assert_eq!(order.subtotal, 52.5);
        assert_eq!(order.total, 57.0);
    }

    #[test]
    fn test_total_invariant_with_zero_shipping() {
        let mut order = order_with_lines(vec![line(1.0, 19.99)], 0.0);
        recalculate_totals(&mut order);
        assert_eq!(order.total, order.subtotal);
    }

    #[test]
    fn test_fractional_quantity_totals() {
        // 37.5 liters at 1.459/L
        let mut order = order_with_lines(vec![line(37.5, 1.459)], 0.0);
        recalculate_totals(&mut order);
        assert_eq!(order.subtotal, 54.71); // 54.7125 rounds half-up
    }

    #[test]
    fn test_validate_line_rejects_bad_input() {
        assert!(validate_line(0.0, 1.0).is_err());
        assert!(validate_line(-1.0, 1.0).is_err());
        assert!(validate_line(1.0, -0.01).is_err());
        assert!(validate_line(f64::NAN, 1.0).is_err());
        assert!(validate_line(1.0, f64::INFINITY).is_err());
        assert!(validate_line(2_000_000.0, 1.0).is_err());
        assert!(validate_line(0.5, 0.0).is_ok());
    }

    #[test]
    fn test_validate_value_requires_positive() {
        assert!(validate_value(0.0).is_err());
        assert!(validate_value(-5.0).is_err());
        assert!(validate_value(f64::NAN).is_err());
        assert!(validate_value(0.01).is_ok());
    }

    #[test]
    fn test_validate_shipping_allows_zero() {
        assert!(validate_shipping(0.0).is_ok());
        assert!(validate_shipping(-0.01).is_err());
    }

    #[test]
    fn test_round_quantity_three_places() {
        assert_eq!(round_quantity(1.0005), 1.001);
        assert_eq!(round_quantity(2.5 - 1.25), 1.25);
    }
}
