use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::orders::{OrderStore, OrdersManager};
use crate::services::{CatalogClient, HttpReturnNotifier, ReturnNotifier};

/// Shared server state - singleton references to all services
///
/// Cloning is shallow (Arc all the way down), so handlers receive a cheap
/// copy per request.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Immutable configuration |
/// | orders | Arc<OrdersManager> | Order/return workflow coordinator |
/// | catalog | Arc<CatalogClient> | Menu item lookups at order creation |
/// | notifier | Arc<dyn ReturnNotifier> | Best-effort return-approved signal |
/// | jwt_service | Arc<JwtService> | Bearer token verification |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub orders: Arc<OrdersManager>,
    pub catalog: Arc<CatalogClient>,
    pub notifier: Arc<dyn ReturnNotifier>,
    pub jwt_service: Arc<JwtService>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("orders", &"<OrdersManager>")
            .finish()
    }
}

impl ServerState {
    /// Initialize server state
    ///
    /// 1. Ensure the work directory layout exists
    /// 2. Open the order store at `{work_dir}/database/fulfillment.redb`
    /// 3. Construct collaborator clients and the JWT service
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        tracing::info!(path = %db_path.display(), "Opening order store");
        let store = OrderStore::open(&db_path)?;
        let orders = Arc::new(OrdersManager::new(store));

        let catalog = Arc::new(CatalogClient::new(
            config.catalog_url.clone(),
            config.service_token.clone(),
        ));
        let notifier: Arc<dyn ReturnNotifier> = Arc::new(HttpReturnNotifier::new(
            config.payments_url.clone(),
            config.service_token.clone(),
        ));
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            orders,
            catalog,
            notifier,
            jwt_service,
        })
    }

    /// Build state around an existing manager (for tests)
    pub fn with_manager(config: Config, orders: Arc<OrdersManager>) -> Self {
        let catalog = Arc::new(CatalogClient::new(
            config.catalog_url.clone(),
            config.service_token.clone(),
        ));
        let notifier: Arc<dyn ReturnNotifier> = Arc::new(HttpReturnNotifier::new(
            config.payments_url.clone(),
            config.service_token.clone(),
        ));
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config,
            orders,
            catalog,
            notifier,
            jwt_service,
        }
    }

    pub fn orders_manager(&self) -> &OrdersManager {
        &self.orders
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
