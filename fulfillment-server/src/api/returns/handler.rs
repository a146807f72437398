//! Return API Handlers
//!
//! Queues and approvals for the return workflow. Queue polling mirrors the
//! order queues: every call re-derives from current state.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::projections;
use crate::services::notify::ReturnApprovedNotification;
use crate::utils::{AppError, AppResult};
use shared::order::Station;
use shared::returns::ReturnRequest;

/// Query params for GET /api/returns
#[derive(Debug, Deserialize)]
pub struct ReturnsQuery {
    /// Station inbox: non-terminal returns involving this station
    pub station: Option<Station>,
    /// `admin`: returns awaiting the administrative sign-off
    pub scope: Option<String>,
}

/// GET /api/returns - Pending-return queues
///
/// Exactly one of `station` or `scope=admin` selects the queue.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReturnsQuery>,
) -> AppResult<Json<Vec<ReturnRequest>>> {
    let requests = match (&query.station, query.scope.as_deref()) {
        (Some(station), None) => projections::returns_for_station(state.orders.store(), *station)?,
        (None, Some("admin")) => projections::returns_pending_admin(state.orders.store())?,
        (None, Some(scope)) => {
            return Err(AppError::Validation(format!("unknown scope: {}", scope)));
        }
        _ => {
            return Err(AppError::Validation(
                "exactly one of station or scope=admin is required".to_string(),
            ));
        }
    };
    Ok(Json(requests))
}

/// Body for POST /api/returns/:id/approve-station
#[derive(Debug, Deserialize)]
pub struct ApproveStationRequest {
    pub station: Station,
}

/// POST /api/returns/:id/approve-station - Station sign-off
///
/// 403 when the station is not in the request's required set; 409 when the
/// request has already moved past REQUESTED.
pub async fn approve_station(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(req): Json<ApproveStationRequest>,
) -> AppResult<Json<ReturnRequest>> {
    let request = state
        .orders
        .approve_station(&id, req.station, &user.username)?;
    Ok(Json(request))
}

/// POST /api/returns/:id/approve-admin - Administrative sign-off (terminal)
///
/// On success, notifies the payment/inventory collaborators on a detached
/// task; delivery failure never rolls the approval back.
pub async fn approve_admin(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<ReturnRequest>> {
    let approved = state.orders.approve_admin(&id, &user.username)?;

    let notifier = state.notifier.clone();
    let notification = ReturnApprovedNotification {
        order_id: approved.request.order_ref.clone(),
        reversed_amount: approved.reversed_amount,
    };
    tokio::spawn(async move {
        notifier.return_approved(notification).await;
    });

    Ok(Json(approved.request))
}

/// POST /api/returns/:id/reject - Reject from either open state (terminal)
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
) -> AppResult<Json<ReturnRequest>> {
    let request = state.orders.reject_return(&id, &user.username)?;
    Ok(Json(request))
}
