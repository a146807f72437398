//! Station routing
//!
//! Derives which preparation stations must act on an order and produces
//! station-scoped projections of it. A station-scoped view carries only the
//! line items that station prepares, so a terminal never sees items (or
//! pricing) outside its role; the order's top-level `id`, `order_number`,
//! `status`, `location` and `created_at` pass through unmodified.
//!
//! No side effects anywhere in this module.

use shared::order::{Order, OrderView, Station};
use std::collections::BTreeSet;

use super::money;

/// Distinct stations implicated by an order's line items
///
/// Computed on demand, never stored (the return workflow snapshots it at
/// request creation).
pub fn required_stations(order: &Order) -> BTreeSet<Station> {
    order.stations()
}

/// Project an order down to one station's queue entry
pub fn project_for_station(order: &Order, station: Station) -> OrderView {
    let line_items: Vec<_> = order
        .line_items
        .iter()
        .filter(|item| item.preparation_station == station)
        .cloned()
        .collect();
    let total_amount = money::order_total(&line_items);

    OrderView {
        id: order.id.clone(),
        order_number: order.order_number.clone(),
        location: order.location.clone(),
        status: order.status,
        line_items,
        total_amount,
        station: Some(station),
        created_at: order.created_at,
    }
}

/// Full projection with every line item (waiter/cashier terminals)
pub fn full_view(order: &Order) -> OrderView {
    OrderView {
        id: order.id.clone(),
        order_number: order.order_number.clone(),
        location: order.location.clone(),
        status: order.status,
        line_items: order.line_items.clone(),
        total_amount: money::order_total(&order.line_items),
        station: None,
        created_at: order.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{Location, LocationKind, OrderLineItem, OrderStatus};

    fn item(id: &str, station: Station, quantity: i32, price: f64) -> OrderLineItem {
        OrderLineItem {
            id: id.to_string(),
            menu_item_ref: format!("menu:{}", id),
            name: id.to_string(),
            quantity,
            unit_price_snapshot: price,
            preparation_station: station,
        }
    }

    fn mixed_order() -> Order {
        Order::new(
            "order-1".to_string(),
            "ORD2026080710001".to_string(),
            Location {
                kind: LocationKind::Pool,
                identifier: "cabana-2".to_string(),
            },
            vec![
                item("burger", Station::Kitchen, 2, 14.0),
                item("fries", Station::Kitchen, 1, 4.5),
                item("mojito", Station::Bar, 3, 9.0),
            ],
        )
    }

    #[test]
    fn test_required_stations() {
        let order = mixed_order();
        let stations = required_stations(&order);
        assert_eq!(stations, BTreeSet::from([Station::Kitchen, Station::Bar]));

        // Stable across repeated reads while items are unmodified
        assert_eq!(required_stations(&order), stations);
    }

    #[test]
    fn test_station_projection_filters_items() {
        let order = mixed_order();
        let view = project_for_station(&order, Station::Bar);

        assert_eq!(view.line_items.len(), 1);
        assert_eq!(view.line_items[0].id, "mojito");
        assert_eq!(view.station, Some(Station::Bar));
        // Bar only sees bar pricing: 3 × 9.00
        assert_eq!(view.total_amount, 27.0);
        // Top-level fields pass through untouched
        assert_eq!(view.id, order.id);
        assert_eq!(view.status, OrderStatus::Pending);
        assert_eq!(view.location, order.location);
        assert_eq!(view.created_at, order.created_at);
    }

    #[test]
    fn test_station_projection_can_be_empty() {
        let mut order = mixed_order();
        order.line_items.retain(|i| i.preparation_station == Station::Kitchen);

        let view = project_for_station(&order, Station::Bar);
        assert!(view.line_items.is_empty());
        assert_eq!(view.total_amount, 0.0);
    }

    #[test]
    fn test_full_view_totals_all_items() {
        let order = mixed_order();
        let view = full_view(&order);
        assert_eq!(view.line_items.len(), 3);
        assert_eq!(view.station, None);
        // 2×14.00 + 1×4.50 + 3×9.00
        assert_eq!(view.total_amount, 59.5);
    }
}
