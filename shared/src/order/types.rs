//! Shared types for the order workflow

use serde::{Deserialize, Serialize};

// ============================================================================
// Station
// ============================================================================

/// Preparation station responsible for a subset of an order's line items
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Station {
    #[default]
    Kitchen,
    Bar,
}

impl Station {
    pub fn as_str(&self) -> &'static str {
        match self {
            Station::Kitchen => "KITCHEN",
            Station::Bar => "BAR",
        }
    }
}

impl std::fmt::Display for Station {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Location
// ============================================================================

/// Delivery point kind for an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationKind {
    #[default]
    Room,
    Table,
    WalkIn,
    Pool,
    Beach,
}

/// Guest-facing delivery point for an order
///
/// The identifier is free text (room number, table label). Validity of the
/// identifier is the concern of the room/table collaborators, not this core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub kind: LocationKind,
    pub identifier: String,
}

// ============================================================================
// Order Status
// ============================================================================

/// Order status - single scalar for the whole order
///
/// Transitions are strictly monotonic: PENDING → PREPARING → READY → SERVED.
/// There is no backward move and no repeat; "already READY" is a transition
/// error, not a silent no-op.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
}

impl OrderStatus {
    /// The only status this one may advance to, if any
    pub fn successor(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served => None,
        }
    }

    /// Whether this status ends the fulfillment lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Served)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Served => "SERVED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// One ordered quantity of a catalog item
///
/// `unit_price_snapshot` and `name` are captured from the catalog at
/// order-creation time and never recalculated, so later catalog changes do
/// not retroactively alter existing orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Line item ID (assigned by server)
    pub id: String,
    /// Opaque reference into the catalog collaborator
    pub menu_item_ref: String,
    /// Display name snapshot
    pub name: String,
    /// Ordered quantity (positive)
    pub quantity: i32,
    /// Per-unit price captured at creation (write-once)
    pub unit_price_snapshot: f64,
    /// Station that must prepare this item
    pub preparation_station: Station,
}

// ============================================================================
// Audit
// ============================================================================

/// One recorded lifecycle transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Operator (terminal user) who issued the transition
    pub actor: String,
    /// Epoch millis
    pub at: i64,
}
