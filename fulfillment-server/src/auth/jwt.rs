//! JWT token service
//!
//! Validation (and, for dev tooling and tests, generation) of the bearer
//! tokens issued by the session collaborator.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret (at least 32 bytes)
    pub secret: String,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if secret.len() >= 32 => secret,
            Ok(_) | Err(_) => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET missing or too short, generating a dev-only secret");
                    generate_dev_jwt_secret()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("JWT_SECRET must be set to at least 32 bytes in production");
                }
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER")
                .unwrap_or_else(|_| "fulfillment-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "terminals".to_string()),
        }
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (subject)
    pub sub: String,
    pub username: String,
    /// Terminal role
    pub role: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued-at timestamp
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// Generate a printable dev-only JWT secret
#[cfg(debug_assertions)]
fn generate_dev_jwt_secret() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..48)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// JWT validation/generation service
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Extract the token from an `Authorization: Bearer <token>` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim)
    }

    /// Generate a token (dev tooling and tests; issuance is external)
    pub fn generate_token(
        &self,
        user_id: &str,
        username: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            _ => JwtError::InvalidToken(e.to_string()),
        })
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new(JwtConfig::default())
    }
}
