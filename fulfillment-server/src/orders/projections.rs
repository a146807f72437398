//! Read-side projections for polling terminals
//!
//! Pure read models layered over the store. Every poll re-derives from a
//! fresh read transaction, so there is no cache to invalidate; the only
//! staleness is the terminal's own polling interval.
//!
//! Queues are sorted oldest-first (the order terminals work them in).

use shared::order::{LocationKind, Order, OrderView, Station};
use shared::returns::{ReturnRequest, ReturnStatus};

use super::storage::OrderStore;
use super::{WorkflowError, WorkflowResult, routing};

/// Filters for the active-orders queue
#[derive(Debug, Clone, Default)]
pub struct ActiveOrdersFilter {
    /// Match `location.identifier` exactly
    pub location: Option<String>,
    /// Match `location.kind`
    pub kind: Option<LocationKind>,
    /// Project down to one station's items; orders with none are dropped
    pub station: Option<Station>,
}

fn matches_filter(order: &Order, filter: &ActiveOrdersFilter) -> bool {
    if let Some(location) = &filter.location
        && order.location.identifier != *location
    {
        return false;
    }
    if let Some(kind) = filter.kind
        && order.location.kind != kind
    {
        return false;
    }
    if let Some(station) = filter.station
        && !order.involves_station(station)
    {
        return false;
    }
    true
}

/// Orders not yet SERVED, filtered and projected for the caller
pub fn active_orders(
    store: &OrderStore,
    filter: &ActiveOrdersFilter,
) -> WorkflowResult<Vec<OrderView>> {
    let mut orders = store.list_active_orders()?;
    orders.retain(|order| matches_filter(order, filter));
    orders.sort_by_key(|order| order.created_at);

    let views = orders
        .iter()
        .map(|order| match filter.station {
            Some(station) => routing::project_for_station(order, station),
            None => routing::full_view(order),
        })
        .collect();
    Ok(views)
}

/// Full view of a single order
pub fn order_view(store: &OrderStore, order_id: &str) -> WorkflowResult<OrderView> {
    let order = store
        .get_order(order_id)?
        .ok_or_else(|| WorkflowError::OrderNotFound(order_id.to_string()))?;
    Ok(routing::full_view(&order))
}

/// A station's pending-returns inbox
///
/// Includes every non-terminal request whose station snapshot contains the
/// station - also those another station already moved to APPROVED_STATION,
/// so half-approved requests never silently drop out of an inbox.
pub fn returns_for_station(
    store: &OrderStore,
    station: Station,
) -> WorkflowResult<Vec<ReturnRequest>> {
    let mut requests = store.list_open_returns()?;
    requests.retain(|request| request.requires_station(station));
    requests.sort_by_key(|request| request.requested_at);
    Ok(requests)
}

/// Returns awaiting the administrative sign-off
pub fn returns_pending_admin(store: &OrderStore) -> WorkflowResult<Vec<ReturnRequest>> {
    let mut requests = store.list_open_returns()?;
    requests.retain(|request| request.status == ReturnStatus::ApprovedStation);
    requests.sort_by_key(|request| request.requested_at);
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::OrdersManager;
    use shared::order::{Location, OrderLineItem, OrderStatus};

    fn item(station: Station, quantity: i32, price: f64) -> OrderLineItem {
        OrderLineItem {
            id: uuid::Uuid::new_v4().to_string(),
            menu_item_ref: "menu:1".to_string(),
            name: "Test item".to_string(),
            quantity,
            unit_price_snapshot: price,
            preparation_station: station,
        }
    }

    fn location(kind: LocationKind, identifier: &str) -> Location {
        Location {
            kind,
            identifier: identifier.to_string(),
        }
    }

    fn seeded_manager() -> (OrdersManager, Vec<String>) {
        let manager = OrdersManager::new(OrderStore::open_in_memory().unwrap());
        let kitchen_room = manager
            .create_order(
                location(LocationKind::Room, "101"),
                vec![item(Station::Kitchen, 1, 15.0)],
            )
            .unwrap();
        let bar_pool = manager
            .create_order(
                location(LocationKind::Pool, "cabana-1"),
                vec![item(Station::Bar, 2, 9.0)],
            )
            .unwrap();
        let mixed_table = manager
            .create_order(
                location(LocationKind::Table, "T2"),
                vec![item(Station::Kitchen, 1, 22.0), item(Station::Bar, 1, 7.0)],
            )
            .unwrap();
        (manager, vec![kitchen_room.id, bar_pool.id, mixed_table.id])
    }

    #[test]
    fn test_station_filter_projects_queues() {
        let (manager, _) = seeded_manager();

        let bar_queue = active_orders(
            manager.store(),
            &ActiveOrdersFilter {
                station: Some(Station::Bar),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(bar_queue.len(), 2);
        for view in &bar_queue {
            assert_eq!(view.station, Some(Station::Bar));
            assert!(
                view.line_items
                    .iter()
                    .all(|i| i.preparation_station == Station::Bar)
            );
        }
    }

    #[test]
    fn test_location_filters() {
        let (manager, _) = seeded_manager();

        let room_queue = active_orders(
            manager.store(),
            &ActiveOrdersFilter {
                location: Some("101".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(room_queue.len(), 1);
        assert_eq!(room_queue[0].location.identifier, "101");

        let pool_queue = active_orders(
            manager.store(),
            &ActiveOrdersFilter {
                kind: Some(LocationKind::Pool),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(pool_queue.len(), 1);
    }

    #[test]
    fn test_served_orders_leave_every_queue() {
        let (manager, ids) = seeded_manager();

        for target in [
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Served,
        ] {
            manager.advance(&ids[0], target, "kitchen-1").unwrap();
        }

        let all = active_orders(manager.store(), &ActiveOrdersFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|view| view.id != ids[0]));

        // The record is still readable directly
        assert!(order_view(manager.store(), &ids[0]).is_ok());
    }

    #[test]
    fn test_station_inbox_keeps_half_approved_requests() {
        let (manager, ids) = seeded_manager();

        let request = manager
            .request_return(&ids[2], "guest changed mind", "waiter-1")
            .unwrap();

        // Both required stations see the fresh request
        assert_eq!(
            returns_for_station(manager.store(), Station::Kitchen)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            returns_for_station(manager.store(), Station::Bar)
                .unwrap()
                .len(),
            1
        );

        manager
            .approve_station(&request.id, Station::Bar, "bar-1")
            .unwrap();

        // Still visible to the kitchen after the bar's approval
        let kitchen_inbox = returns_for_station(manager.store(), Station::Kitchen).unwrap();
        assert_eq!(kitchen_inbox.len(), 1);
        assert_eq!(kitchen_inbox[0].status, ReturnStatus::ApprovedStation);

        // And now in the admin queue
        assert_eq!(returns_pending_admin(manager.store()).unwrap().len(), 1);

        manager.approve_admin(&request.id, "manager-1").unwrap();

        // Terminal requests leave every queue
        assert!(
            returns_for_station(manager.store(), Station::Kitchen)
                .unwrap()
                .is_empty()
        );
        assert!(returns_pending_admin(manager.store()).unwrap().is_empty());
    }

    #[test]
    fn test_admin_queue_excludes_fresh_requests() {
        let (manager, ids) = seeded_manager();
        manager
            .request_return(&ids[1], "wrong drink", "waiter-1")
            .unwrap();

        assert!(returns_pending_admin(manager.store()).unwrap().is_empty());
        assert_eq!(
            returns_for_station(manager.store(), Station::Bar)
                .unwrap()
                .len(),
            1
        );
    }
}
