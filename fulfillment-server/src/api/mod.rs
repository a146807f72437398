//! API Module - the polling gateway
//!
//! Stateless request handlers exposed to the terminals. Every endpoint is
//! safe to retry blindly: reads are idempotent by nature, and writes fail
//! with 409 on a lost race instead of double-applying.
//!
//! # Routes
//!
//! - [`orders`] - checkout creation, active queues, lifecycle advance
//! - [`returns`] - return queues and two-stage approvals
//! - [`health`] - health checks (public)

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

pub mod health;
pub mod orders;
pub mod returns;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(orders::router())
        .merge(returns::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - terminals are served from their own origins
        .layer(CorsLayer::permissive())
        // Compression - gzip responses (queues are repetitive JSON)
        .layer(CompressionLayer::new())
        // Trace - request logging at INFO level
        .layer(TraceLayer::new_for_http())
        // ========== Application Middleware ==========
        // Request ID - unique ID per request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Bearer-token authentication - injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::orders::{OrderStore, OrdersManager};
    use axum::body::Body;
    use http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> ServerState {
        let manager = Arc::new(OrdersManager::new(OrderStore::open_in_memory().unwrap()));
        ServerState::with_manager(Config::from_env(), manager)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let state = test_state();
        let app = build_app(&state).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_requires_bearer_token() {
        let state = test_state();
        let app = build_app(&state).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/orders/active")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_reaches_the_queue() {
        let state = test_state();
        let token = state
            .jwt_service
            .generate_token("u-1", "kitchen-1", "kitchen")
            .unwrap();
        let app = build_app(&state).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/orders/active?station=KITCHEN")
                    .header(http::header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_gate_rejects_station_roles() {
        let state = test_state();
        let token = state
            .jwt_service
            .generate_token("u-2", "bar-1", "bar")
            .unwrap();
        let app = build_app(&state).with_state(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/returns/ret-1/approve-admin")
                    .header(http::header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
