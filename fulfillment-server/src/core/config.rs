use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration, loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory root; the database lives under `{work_dir}/database`
    pub work_dir: String,
    pub http_port: u16,
    pub environment: String,

    /// Base URL of the catalog collaborator (menu item lookups at creation)
    pub catalog_url: String,
    /// Base URL of the payment/inventory collaborator (return notifications)
    pub payments_url: String,
    /// Outbound bearer token for collaborator calls
    pub service_token: String,

    pub jwt: JwtConfig,

    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/resort/orders".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            catalog_url: std::env::var("CATALOG_URL")
                .unwrap_or_else(|_| "http://localhost:3001".into()),
            payments_url: std::env::var("PAYMENTS_URL")
                .unwrap_or_else(|_| "http://localhost:3002".into()),
            service_token: std::env::var("SERVICE_TOKEN").unwrap_or_default(),

            jwt: JwtConfig::default(),

            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Create a config with custom overrides
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Ensure the working directory layout exists
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_dir().join("fulfillment.redb")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
