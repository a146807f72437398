//! Order API Handlers
//!
//! - Create order (checkout collaborator; snapshots catalog data)
//! - List active orders, optionally filtered/projected per station
//! - Order detail
//! - Advance lifecycle status
//! - File a return request
//!
//! Terminals poll these endpoints on fixed intervals; a 409 from `advance`
//! means another terminal won the race and the caller just refreshes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders::projections::{self, ActiveOrdersFilter};
use crate::utils::{AppError, AppResult};
use shared::order::{Location, LocationKind, Order, OrderLineItem, OrderStatus, OrderView, Station};
use shared::returns::ReturnRequest;

/// One requested item from checkout; snapshots are resolved server-side
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LineItemInput {
    #[validate(length(min = 1))]
    pub menu_item_ref: String,
    #[validate(range(min = 1, max = 9999))]
    pub quantity: i32,
}

/// Body for POST /api/orders
#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    pub location: Location,
    #[validate(length(min = 1), nested)]
    pub items: Vec<LineItemInput>,
}

/// POST /api/orders - Create a PENDING order
///
/// Resolves each item against the catalog exactly once and captures the
/// price/name/station snapshots; later catalog changes never touch this
/// order.
pub async fn create(
    State(state): State<ServerState>,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut line_items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let info = state.catalog.menu_item(&item.menu_item_ref).await?;
        line_items.push(OrderLineItem {
            id: uuid::Uuid::new_v4().to_string(),
            menu_item_ref: item.menu_item_ref.clone(),
            name: info.name,
            quantity: item.quantity,
            unit_price_snapshot: info.price,
            preparation_station: info.preparation_station,
        });
    }

    let order = state.orders.create_order(req.location, line_items)?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Query params for the active-orders queue
#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    /// Project down to one station's items
    pub station: Option<Station>,
    /// Match `location.identifier` exactly
    pub location: Option<String>,
    /// Match `location.kind`
    pub kind: Option<LocationKind>,
}

/// GET /api/orders/active - Orders not yet SERVED
pub async fn list_active(
    State(state): State<ServerState>,
    Query(query): Query<ActiveQuery>,
) -> AppResult<Json<Vec<OrderView>>> {
    let filter = ActiveOrdersFilter {
        location: query.location,
        kind: query.kind,
        station: query.station,
    };
    let views = projections::active_orders(state.orders.store(), &filter)?;
    Ok(Json(views))
}

/// GET /api/orders/:id - Full order view
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let view = projections::order_view(state.orders.store(), &id)?;
    Ok(Json(view))
}

/// Body for POST /api/orders/:id/advance
#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub target_status: OrderStatus,
}

/// POST /api/orders/:id/advance - Move an order to its next status
///
/// 409 `InvalidTransition` when the caller lost a race or skipped a step;
/// terminals treat that as "refresh and re-render".
pub async fn advance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(req): Json<AdvanceRequest>,
) -> AppResult<Json<OrderView>> {
    let order = state
        .orders
        .advance(&id, req.target_status, &user.username)?;
    Ok(Json(crate::orders::routing::full_view(&order)))
}

/// Body for POST /api/orders/:id/returns
#[derive(Debug, Deserialize, Validate)]
pub struct ReturnRequestBody {
    #[validate(length(min = 1, message = "reason must not be empty"))]
    pub reason: String,
}

/// POST /api/orders/:id/returns - File a return request
///
/// 409 `InvalidState` when the order already has an open return.
pub async fn request_return(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    user: CurrentUser,
    Json(req): Json<ReturnRequestBody>,
) -> AppResult<(StatusCode, Json<ReturnRequest>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let request = state
        .orders
        .request_return(&id, &req.reason, &user.username)?;
    Ok((StatusCode::CREATED, Json(request)))
}
