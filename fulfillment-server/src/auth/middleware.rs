//! Authentication middleware
//!
//! Axum middleware for JWT authentication and the admin gate.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Authentication middleware - requires a valid bearer token
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`,
/// then injects [`CurrentUser`] into request extensions.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - anything outside `/api/` (health endpoints are public)
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without authorization header");
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin middleware - requires `CurrentUser.role == "admin"`
///
/// Applied as a route layer on the administrative return approval; runs
/// inside `require_auth`, which has already injected the user.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::Unauthorized)?;
    if !user.is_admin() {
        tracing::warn!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "Admin gate rejected user"
        );
        return Err(AppError::forbidden("Administrator role required"));
    }

    Ok(next.run(req).await)
}
