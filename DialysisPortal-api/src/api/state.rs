use std::sync::Arc;

use dialysis_portal_data::repository::{PortalApiTrait, PortalConnector, StaticCredentials};
use dialysis_portal_domain::services::{create_history_service, HistoryService, HistoryServiceConfig};

use crate::config::AppConfig;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    connector: Arc<dyn PortalConnector>,
    history_config: HistoryServiceConfig,
    environment: String,
}

impl AppState {
    pub fn new(connector: Arc<dyn PortalConnector>, history_config: HistoryServiceConfig, environment: impl Into<String>) -> Self {
        Self {
            connector,
            history_config,
            environment: environment.into(),
        }
    }

    /// Build state from resolved configuration
    pub fn from_config(connector: Arc<dyn PortalConnector>, config: &AppConfig) -> Self {
        Self::new(connector, config.history_config(), config.environment.clone())
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// History service talking to the portal with the caller's token
    pub fn history_service(&self, token: &str) -> HistoryService<Arc<dyn PortalApiTrait>> {
        let api = self.connector.connect(Arc::new(StaticCredentials::new(token)));
        create_history_service(api, self.history_config)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("history_config", &self.history_config)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
