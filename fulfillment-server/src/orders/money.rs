//! Money calculation utilities using rust_decimal for precision
//!
//! Totals are never stored on order records; they are derived on read from
//! the line-item snapshots. All arithmetic is done in `Decimal`, then
//! converted to `f64` for serialization.

use rust_decimal::prelude::*;
use shared::order::OrderLineItem;

use super::{WorkflowError, WorkflowResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 9999;

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

/// Line total: quantity × unit price snapshot
pub fn line_total(item: &OrderLineItem) -> Decimal {
    to_decimal(item.unit_price_snapshot) * Decimal::from(item.quantity)
}

/// Order total over the given line items
pub fn order_total(items: &[OrderLineItem]) -> f64 {
    let total: Decimal = items.iter().map(line_total).sum();
    to_f64(total)
}

/// Validate a unit price snapshot before persisting it
pub fn validate_unit_price(price: f64) -> WorkflowResult<()> {
    if !price.is_finite() {
        return Err(WorkflowError::Validation(format!(
            "unit price must be a finite number, got {}",
            price
        )));
    }
    if price < 0.0 {
        return Err(WorkflowError::Validation(format!(
            "unit price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(WorkflowError::Validation(format!(
            "unit price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }
    Ok(())
}

/// Validate a line-item quantity before persisting it
pub fn validate_quantity(quantity: i32) -> WorkflowResult<()> {
    if quantity <= 0 {
        return Err(WorkflowError::Validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(WorkflowError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::Station;

    fn item(quantity: i32, unit_price: f64) -> OrderLineItem {
        OrderLineItem {
            id: "item-1".to_string(),
            menu_item_ref: "menu:1".to_string(),
            name: "Test".to_string(),
            quantity,
            unit_price_snapshot: unit_price,
            preparation_station: Station::Kitchen,
        }
    }

    #[test]
    fn test_order_total_is_precise() {
        // 0.1 + 0.2 style float drift must not leak into totals
        let items = vec![item(3, 0.1), item(1, 0.2)];
        assert_eq!(order_total(&items), 0.5);
    }

    #[test]
    fn test_order_total_rounds_half_up() {
        let items = vec![item(1, 1.005)];
        assert_eq!(order_total(&items), 1.01);
    }

    #[test]
    fn test_empty_order_total() {
        assert_eq!(order_total(&[]), 0.0);
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(12.5).is_ok());
        assert!(validate_unit_price(0.0).is_ok());
        assert!(validate_unit_price(-1.0).is_err());
        assert!(validate_unit_price(f64::NAN).is_err());
        assert!(validate_unit_price(f64::INFINITY).is_err());
        assert!(validate_unit_price(2_000_000.0).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(10_000).is_err());
    }
}
