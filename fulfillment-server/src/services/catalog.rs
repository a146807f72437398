//! Catalog collaborator client
//!
//! Menu items are looked up exactly once, at order-creation time, to capture
//! the price/name/station snapshots. The catalog is never consulted again
//! for an existing order.

use serde::Deserialize;
use shared::order::Station;
use thiserror::Error;

use crate::utils::AppError;

/// Menu item metadata as served by the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemInfo {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub preparation_station: Station,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Menu item not found: {0}")]
    NotFound(String),

    #[error("Menu item not available: {0}")]
    Unavailable(String),

    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog returned status {status} for menu item {id}")]
    Status { status: u16, id: String },
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => {
                AppError::Validation(format!("unknown menu item: {}", id))
            }
            CatalogError::Unavailable(id) => {
                AppError::Validation(format!("menu item not available: {}", id))
            }
            other => {
                tracing::error!(error = %other, "Catalog lookup failed");
                AppError::Internal(other.to_string())
            }
        }
    }
}

/// HTTP client for the catalog collaborator
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CatalogClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Fetch one menu item; fails for unknown or unavailable items
    pub async fn menu_item(&self, menu_item_ref: &str) -> Result<MenuItemInfo, CatalogError> {
        let url = format!("{}/api/menu-items/{}", self.base_url, menu_item_ref);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(menu_item_ref.to_string()));
        }
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                id: menu_item_ref.to_string(),
            });
        }

        let info: MenuItemInfo = response.json().await?;
        if !info.is_available {
            return Err(CatalogError::Unavailable(menu_item_ref.to_string()));
        }
        Ok(info)
    }
}
