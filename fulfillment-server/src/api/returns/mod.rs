//! Return API Module
//!
//! Pending-return queues and the two-stage approval endpoints. The
//! administrative approval sits behind the admin gate.

mod handler;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

/// Return router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/returns", routes())
}

fn routes() -> Router<ServerState> {
    // Admin-only: the final sign-off
    let admin = Router::new()
        .route("/{id}/approve-admin", post(handler::approve_admin))
        .layer(axum_middleware::from_fn(require_admin));

    Router::new()
        // Pending queues (?station= or ?scope=admin)
        .route("/", get(handler::list))
        // Station sign-off
        .route("/{id}/approve-station", post(handler::approve_station))
        // Rejection from either open state
        .route("/{id}/reject", post(handler::reject))
        .merge(admin)
}
