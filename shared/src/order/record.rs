//! Order record - authoritative per-order state
//!
//! The record never stores a total amount: totals are derived on read from
//! the line-item snapshots, so there is no stored aggregate to drift.

use super::types::{Location, OrderLineItem, OrderStatus, Station, StatusChange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One guest fulfillment request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by server)
    pub id: String,
    /// Human-facing daily order number
    pub order_number: String,
    /// Delivery point
    pub location: Location,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// Line items, insertion order preserved for display
    pub line_items: Vec<OrderLineItem>,
    /// Lifecycle audit trail, append-only
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    /// Creation timestamp (epoch millis), immutable
    pub created_at: i64,
    /// Last persisted mutation (epoch millis)
    pub updated_at: i64,
}

impl Order {
    /// Create a new PENDING order
    pub fn new(
        id: String,
        order_number: String,
        location: Location,
        line_items: Vec<OrderLineItem>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id,
            order_number,
            location,
            status: OrderStatus::Pending,
            line_items,
            status_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the order has completed its lifecycle
    pub fn is_served(&self) -> bool {
        self.status == OrderStatus::Served
    }

    /// Distinct preparation stations implicated by this order's line items
    ///
    /// Computed, never stored.
    pub fn stations(&self) -> BTreeSet<Station> {
        self.line_items
            .iter()
            .map(|item| item.preparation_station)
            .collect()
    }

    /// Whether any line item belongs to the given station
    pub fn involves_station(&self, station: Station) -> bool {
        self.line_items
            .iter()
            .any(|item| item.preparation_station == station)
    }
}

/// Read-side projection of an order served to polling terminals
///
/// Either a full view (waiter/cashier) or a station-scoped view carrying
/// only that station's line items. Top-level fields are passed through
/// unmodified from the record; `total_amount` is computed over the included
/// items only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderView {
    pub id: String,
    pub order_number: String,
    pub location: Location,
    pub status: OrderStatus,
    pub line_items: Vec<OrderLineItem>,
    /// Derived sum of quantity × unit_price_snapshot over included items
    pub total_amount: f64,
    /// Station scope of this view, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station: Option<Station>,
    pub created_at: i64,
}
