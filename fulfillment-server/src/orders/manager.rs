//! OrdersManager - transactional workflow coordinator
//!
//! Every mutation follows the same shape:
//!
//! ```text
//! begin_write → load record → validate (pure state machine) → persist → commit
//! ```
//!
//! redb admits a single write transaction at a time, so concurrent calls
//! against the same order or return serialize here; the loser of a race
//! re-reads state the winner already committed and fails validation with
//! `InvalidTransition`/`InvalidState`. Calls against different entities only
//! contend on the short write window, never on each other's validation.

use chrono::Local;
use shared::order::{Location, Order, OrderLineItem, OrderStatus, Station};
use shared::returns::ReturnRequest;

use super::storage::OrderStore;
use super::{WorkflowError, WorkflowResult, lifecycle, money, returns};

/// Outcome of an administrative approval, carrying what the payment and
/// inventory collaborators must be told
#[derive(Debug, Clone)]
pub struct ApprovedReturn {
    pub request: ReturnRequest,
    /// Amount to reverse: the order total derived from its snapshots
    pub reversed_amount: f64,
}

/// Workflow coordinator over the order store
pub struct OrdersManager {
    store: OrderStore,
}

impl OrdersManager {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }

    /// Get the underlying store (read-side queries go through projections)
    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Generate the next human-facing order number (crash-safe via redb)
    fn next_order_number(&self) -> WorkflowResult<String> {
        let count = self.store.next_order_count()?;
        let date_str = Local::now().format("%Y%m%d").to_string();
        Ok(format!("ORD{}{}", date_str, 10000 + count))
    }

    // ========== Order Lifecycle ==========

    /// Create a PENDING order from checkout input
    ///
    /// Line items arrive with their price/name/station snapshots already
    /// resolved from the catalog; this is the only moment catalog data is
    /// consulted, so later price changes never touch existing orders.
    pub fn create_order(
        &self,
        location: Location,
        line_items: Vec<OrderLineItem>,
    ) -> WorkflowResult<Order> {
        if line_items.is_empty() {
            return Err(WorkflowError::Validation(
                "order must contain at least one line item".to_string(),
            ));
        }
        for item in &line_items {
            money::validate_quantity(item.quantity)?;
            money::validate_unit_price(item.unit_price_snapshot)?;
        }

        let order_number = self.next_order_number()?;
        let order = Order::new(
            uuid::Uuid::new_v4().to_string(),
            order_number,
            location,
            line_items,
        );

        let txn = self.store.begin_write()?;
        self.store.put_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            items = order.line_items.len(),
            "Order created"
        );
        Ok(order)
    }

    /// Advance an order to the next lifecycle status
    ///
    /// Fails with `InvalidTransition` unless `target` is the exact successor
    /// of the current status. Persists the new status plus an audit entry.
    pub fn advance(
        &self,
        order_id: &str,
        target: OrderStatus,
        actor: &str,
    ) -> WorkflowResult<Order> {
        let txn = self.store.begin_write()?;
        let mut order = self
            .store
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| WorkflowError::OrderNotFound(order_id.to_string()))?;

        lifecycle::validate_advance(order.status, target)?;
        lifecycle::apply_advance(
            &mut order,
            target,
            actor,
            chrono::Utc::now().timestamp_millis(),
        );

        self.store.put_order(&txn, &order)?;
        txn.commit()?;

        tracing::info!(order_id = %order.id, status = %order.status, operator = %actor, "Order advanced");
        Ok(order)
    }

    // ========== Return Workflow ==========

    /// File a return request against an order
    ///
    /// At most one non-terminal return may exist per order; the open-return
    /// index is checked and updated in the same transaction.
    pub fn request_return(
        &self,
        order_id: &str,
        reason: &str,
        actor: &str,
    ) -> WorkflowResult<ReturnRequest> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::Validation(
                "return reason must not be empty".to_string(),
            ));
        }

        let txn = self.store.begin_write()?;
        let order = self
            .store
            .get_order_txn(&txn, order_id)?
            .ok_or_else(|| WorkflowError::OrderNotFound(order_id.to_string()))?;

        if let Some(open_id) = self.store.open_return_for_order_txn(&txn, order_id)? {
            return Err(WorkflowError::InvalidState(format!(
                "order {} already has an open return request ({})",
                order_id, open_id
            )));
        }

        let request = returns::new_request(
            &order,
            uuid::Uuid::new_v4().to_string(),
            reason.to_string(),
            actor,
        );
        self.store.put_return(&txn, &request)?;
        txn.commit()?;

        tracing::info!(
            return_id = %request.id,
            order_id = %order_id,
            operator = %actor,
            "Return requested"
        );
        Ok(request)
    }

    /// Record a station's sign-off on a return request
    pub fn approve_station(
        &self,
        return_id: &str,
        station: Station,
        actor: &str,
    ) -> WorkflowResult<ReturnRequest> {
        let txn = self.store.begin_write()?;
        let mut request = self
            .store
            .get_return_txn(&txn, return_id)?
            .ok_or_else(|| WorkflowError::ReturnNotFound(return_id.to_string()))?;

        returns::apply_station_approval(&mut request, station)?;

        self.store.put_return(&txn, &request)?;
        txn.commit()?;

        tracing::info!(return_id = %return_id, station = %station, operator = %actor, "Return approved by station");
        Ok(request)
    }

    /// Record the administrative sign-off, terminal-izing the request
    ///
    /// Returns the reversed amount for the caller to forward to the payment
    /// and inventory collaborators (best-effort, outside this transaction).
    pub fn approve_admin(&self, return_id: &str, actor: &str) -> WorkflowResult<ApprovedReturn> {
        let txn = self.store.begin_write()?;
        let mut request = self
            .store
            .get_return_txn(&txn, return_id)?
            .ok_or_else(|| WorkflowError::ReturnNotFound(return_id.to_string()))?;

        returns::apply_admin_approval(&mut request, actor, chrono::Utc::now().timestamp_millis())?;

        let order = self
            .store
            .get_order_txn(&txn, &request.order_ref)?
            .ok_or_else(|| WorkflowError::OrderNotFound(request.order_ref.clone()))?;
        let reversed_amount = money::order_total(&order.line_items);

        self.store.put_return(&txn, &request)?;
        txn.commit()?;

        tracing::info!(
            return_id = %return_id,
            order_id = %request.order_ref,
            reversed_amount,
            operator = %actor,
            "Return approved by admin"
        );
        Ok(ApprovedReturn {
            request,
            reversed_amount,
        })
    }

    /// Reject a return request from either non-terminal state
    pub fn reject_return(&self, return_id: &str, actor: &str) -> WorkflowResult<ReturnRequest> {
        let txn = self.store.begin_write()?;
        let mut request = self
            .store
            .get_return_txn(&txn, return_id)?
            .ok_or_else(|| WorkflowError::ReturnNotFound(return_id.to_string()))?;

        returns::apply_rejection(&mut request, actor, chrono::Utc::now().timestamp_millis())?;

        self.store.put_return(&txn, &request)?;
        txn.commit()?;

        tracing::info!(return_id = %return_id, operator = %actor, "Return rejected");
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::LocationKind;
    use shared::returns::ReturnStatus;
    use std::collections::BTreeSet;

    fn manager() -> OrdersManager {
        OrdersManager::new(OrderStore::open_in_memory().unwrap())
    }

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

    fn table_location() -> Location {
        Location {
            kind: LocationKind::Table,
            identifier: "T5".to_string(),
        }
    }

    #[test]
    fn test_create_order_assigns_number_and_pending() {
        let manager = manager();
        let order = manager
            .create_order(table_location(), vec![item(Station::Kitchen, 1, 10.0)])
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.starts_with("ORD"));

        let second = manager
            .create_order(table_location(), vec![item(Station::Bar, 1, 5.0)])
            .unwrap();
        assert_ne!(order.order_number, second.order_number);
    }

    #[test]
    fn test_create_order_rejects_bad_input() {
        let manager = manager();
        assert!(matches!(
            manager.create_order(table_location(), vec![]),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            manager.create_order(table_location(), vec![item(Station::Kitchen, 0, 10.0)]),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            manager.create_order(table_location(), vec![item(Station::Kitchen, 1, -1.0)]),
            Err(WorkflowError::Validation(_))
        ));
    }

    #[test]
    fn test_advance_unknown_order() {
        let manager = manager();
        assert!(matches!(
            manager.advance("missing", OrderStatus::Preparing, "kitchen-1"),
            Err(WorkflowError::OrderNotFound(_))
        ));
    }

    #[test]
    fn test_price_snapshot_survives_lifecycle() {
        let manager = manager();
        let order = manager
            .create_order(table_location(), vec![item(Station::Kitchen, 2, 12.5)])
            .unwrap();

        manager
            .advance(&order.id, OrderStatus::Preparing, "kitchen-1")
            .unwrap();
        let advanced = manager.advance(&order.id, OrderStatus::Ready, "kitchen-1").unwrap();

        assert_eq!(advanced.line_items[0].unit_price_snapshot, 12.5);
        assert_eq!(advanced.line_items[0].id, order.line_items[0].id);
    }

    #[test]
    fn test_second_open_return_is_rejected() {
        let manager = manager();
        let order = manager
            .create_order(table_location(), vec![item(Station::Bar, 1, 8.0)])
            .unwrap();

        manager
            .request_return(&order.id, "warm beer", "waiter-1")
            .unwrap();
        assert!(matches!(
            manager.request_return(&order.id, "still warm", "waiter-1"),
            Err(WorkflowError::InvalidState(_))
        ));
    }

    #[test]
    fn test_new_return_allowed_after_rejection() {
        let manager = manager();
        let order = manager
            .create_order(table_location(), vec![item(Station::Bar, 1, 8.0)])
            .unwrap();

        let first = manager
            .request_return(&order.id, "warm beer", "waiter-1")
            .unwrap();
        manager.reject_return(&first.id, "manager-1").unwrap();

        let second = manager
            .request_return(&order.id, "actually flat", "waiter-1")
            .unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(second.status, ReturnStatus::Requested);
    }

    #[test]
    fn test_empty_reason_is_rejected() {
        let manager = manager();
        let order = manager
            .create_order(table_location(), vec![item(Station::Bar, 1, 8.0)])
            .unwrap();
        assert!(matches!(
            manager.request_return(&order.id, "   ", "waiter-1"),
            Err(WorkflowError::Validation(_))
        ));
    }

    /// The full walkthrough: mixed kitchen/bar order through its lifecycle
    /// and a two-stage return approval.
    #[test]
    fn test_full_workflow_scenario() {
        let manager = manager();
        let order = manager
            .create_order(
                table_location(),
                vec![item(Station::Kitchen, 2, 14.0), item(Station::Bar, 1, 9.0)],
            )
            .unwrap();

        // Skipping PREPARING is rejected
        assert!(matches!(
            manager.advance(&order.id, OrderStatus::Ready, "waiter-1"),
            Err(WorkflowError::InvalidTransition(_))
        ));

        manager
            .advance(&order.id, OrderStatus::Preparing, "kitchen-1")
            .unwrap();

        // Repeating the transition is rejected
        assert!(matches!(
            manager.advance(&order.id, OrderStatus::Preparing, "bar-1"),
            Err(WorkflowError::InvalidTransition(_))
        ));

        manager
            .advance(&order.id, OrderStatus::Ready, "kitchen-1")
            .unwrap();

        let request = manager
            .request_return(&order.id, "guest changed mind", "waiter-1")
            .unwrap();
        assert_eq!(request.status, ReturnStatus::Requested);
        assert_eq!(
            request.required_stations,
            BTreeSet::from([Station::Kitchen, Station::Bar])
        );

        let request = manager
            .approve_station(&request.id, Station::Bar, "bar-1")
            .unwrap();
        assert_eq!(request.status, ReturnStatus::ApprovedStation);
        assert_eq!(request.station_approvals, BTreeSet::from([Station::Bar]));

        // Already past REQUESTED from the kitchen's perspective
        assert!(matches!(
            manager.approve_station(&request.id, Station::Kitchen, "kitchen-1"),
            Err(WorkflowError::InvalidState(_))
        ));

        let approved = manager.approve_admin(&request.id, "manager-1").unwrap();
        assert_eq!(approved.request.status, ReturnStatus::ApprovedAdmin);
        // 2 × 14.00 + 1 × 9.00
        assert_eq!(approved.reversed_amount, 37.0);

        // Terminal thereafter
        assert!(matches!(
            manager.approve_admin(&request.id, "manager-1"),
            Err(WorkflowError::InvalidState(_))
        ));
    }
}
