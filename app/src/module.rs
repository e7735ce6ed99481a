use crate::app::photo_search::PhotoSearchAppImpl;
use crate::app::{HydrationConfig, SearchConfig};
use anyhow::Result;
use infra::infra::immich::ImmichClient;
use infra::infra::ImmichConfig;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct AppConfigModule {
    pub immich_config: Arc<ImmichConfig>,
    pub search_config: Arc<SearchConfig>,
    pub hydration_config: Arc<HydrationConfig>,
}

impl AppConfigModule {
    /// Fails if SERVER_HOST or IMMICH_API_KEY is missing.
    pub fn new_by_env() -> Result<Self> {
        Ok(Self {
            immich_config: Arc::new(infra::infra::load_immich_config_from_env()?),
            // fixed paging policy, not configurable
            search_config: Arc::new(SearchConfig::default()),
            hydration_config: Arc::new(HydrationConfig::from_env()),
        })
    }
}

#[derive(Clone, Debug)]
pub struct AppModule {
    pub config_module: Arc<AppConfigModule>,
    pub immich_client: Arc<ImmichClient>,
    pub photo_search_app: Arc<PhotoSearchAppImpl>,
}

impl AppModule {
    pub fn new(config_module: Arc<AppConfigModule>) -> Result<Self> {
        let immich_client = Arc::new(ImmichClient::new(&config_module.immich_config)?);
        let photo_search_app = Arc::new(PhotoSearchAppImpl::new(
            immich_client.clone(),
            immich_client.clone(),
            config_module.search_config.as_ref().clone(),
            config_module.hydration_config.as_ref().clone(),
        ));
        tracing::info!(
            "immich app module created: server={}, hydration={:?}",
            config_module.immich_config.server_host,
            config_module.hydration_config
        );
        Ok(Self {
            config_module,
            immich_client,
            photo_search_app,
        })
    }

    pub fn new_by_env() -> Result<Self> {
        Self::new(Arc::new(AppConfigModule::new_by_env()?))
    }
}
