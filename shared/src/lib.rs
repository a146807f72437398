//! Shared types for the resort fulfillment core
//!
//! Domain models used across the order engine and its clients: orders,
//! line items, station routing enums, and return-approval requests.

pub mod order;
pub mod returns;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use order::{
    Location, LocationKind, Order, OrderLineItem, OrderStatus, OrderView, Station, StatusChange,
};
pub use returns::{ReturnRequest, ReturnStatus};
