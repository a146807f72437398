//! Services Module
//!
//! Clients for the excluded collaborators this core talks to:
//! - **catalog**: menu item lookup at order-creation time (price snapshot)
//! - **notify**: best-effort return-approved signal to payments/inventory

pub mod catalog;
pub mod notify;

pub use catalog::{CatalogClient, CatalogError, MenuItemInfo};
pub use notify::{HttpReturnNotifier, ReturnNotifier};
