//! Order Domain Module
//!
//! Types for the order fulfillment workflow:
//! - Record: the authoritative per-order state held by the store
//! - Views: read-side projections served to polling terminals
//! - Inputs: payloads accepted from the checkout collaborator

pub mod record;
pub mod types;

// Re-exports
pub use record::{Order, OrderView};
pub use types::{Location, LocationKind, OrderLineItem, OrderStatus, Station, StatusChange};
