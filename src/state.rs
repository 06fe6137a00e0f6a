//! Shared application state injected into every handler.

use anyhow::Result;
use std::sync::Arc;

use crate::application::services::{
    AuthService, BlockSizeService, RegistryService, RotationService, StatsService,
};
use crate::config::RotationSettings;
use crate::domain::keys::KeySpace;
use crate::infrastructure::store::KeyValueStore;
use crate::utils::Clock;

#[derive(Clone)]
pub struct AppState {
    pub registry_service: Arc<RegistryService>,
    pub rotation_service: Arc<RotationService>,
    pub block_size_service: Arc<BlockSizeService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
    pub store: Arc<dyn KeyValueStore>,
}

impl AppState {
    /// Wires every service onto one store.
    ///
    /// # Errors
    ///
    /// Returns an error if the url allow-list in `settings` does not compile.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        settings: &RotationSettings,
        admin_token: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let keys = KeySpace::new(settings.key_prefix.clone());

        let registry_service = Arc::new(RegistryService::new(
            store.clone(),
            keys.clone(),
            settings.url_policy()?,
        ));
        let block_size_service = Arc::new(BlockSizeService::new(
            store.clone(),
            keys.clone(),
            settings.block_size_default,
        ));
        let rotation_service = Arc::new(RotationService::new(
            store.clone(),
            keys.clone(),
            registry_service.clone(),
            block_size_service.clone(),
        ));
        let stats_service = Arc::new(StatsService::new(
            store.clone(),
            keys,
            registry_service.clone(),
            clock,
            settings.stats_retention_days,
        ));
        let auth_service = Arc::new(AuthService::new(admin_token));

        Ok(Self {
            registry_service,
            rotation_service,
            block_size_service,
            stats_service,
            auth_service,
            store,
        })
    }
}
