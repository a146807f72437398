//! Order API Module
//!
//! Checkout creation plus the polling endpoints terminals build their
//! queues from. All mutations go through the OrdersManager.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // Checkout collaborator creates orders
        .route("/", post(handler::create))
        // Terminal/guest polling queue
        .route("/active", get(handler::list_active))
        // Order detail
        .route("/{id}", get(handler::get_by_id))
        // Lifecycle advance
        .route("/{id}/advance", post(handler::advance))
        // File a return against an order
        .route("/{id}/returns", post(handler::request_return))
}
