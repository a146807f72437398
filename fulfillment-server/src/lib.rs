//! Fulfillment Server - order fulfillment core for the resort suite
//!
//! # Architecture Overview
//!
//! This crate is the one subsystem of the suite with real coordination
//! pressure: several independently-polling terminals (kitchen display, bar
//! display, waiter station, cashier) observe and mutate a shared queue of
//! guest orders with no push channel. All cross-terminal coordination goes
//! through the strongly-consistent order store; staleness up to one polling
//! interval is expected, lost updates are not.
//!
//! - **Orders** (`orders`): redb-backed store, lifecycle state machine,
//!   station routing, return-approval workflow, read projections
//! - **API** (`api`): HTTP polling gateway for terminals
//! - **Auth** (`auth`): bearer-token (JWT) verification; issuance is an
//!   external collaborator
//! - **Services** (`services`): catalog lookup and payment notification
//!   clients
//!
//! # Module Structure
//!
//! ```text
//! fulfillment-server/src/
//! ├── core/          # Config, state, server bootstrap
//! ├── auth/          # JWT verification, current user
//! ├── orders/        # Store, lifecycle, routing, returns, projections
//! ├── services/      # Catalog and payment collaborator clients
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod orders;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStore, OrdersManager, WorkflowError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
