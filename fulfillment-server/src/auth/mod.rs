//! Authentication Module
//!
//! Bearer-token (JWT) *verification* for staff-facing calls. Token issuance
//! is the concern of the excluded session collaborator; this module only
//! validates what it issued and exposes the caller as [`CurrentUser`].

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};

/// The authenticated caller, injected into request extensions by
/// [`middleware::require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    /// Terminal role: kitchen, bar, waiter, cashier, admin, or service
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}
