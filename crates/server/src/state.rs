use std::sync::Arc;

use shamrock_core::{
    ArtifactStore, Config, CountryClient, ImageOrchestrator, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn ArtifactStore>,
    country: CountryClient,
    orchestrator: Option<Arc<ImageOrchestrator>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ArtifactStore>,
        country: CountryClient,
        orchestrator: Option<Arc<ImageOrchestrator>>,
    ) -> Self {
        Self {
            config,
            store,
            country,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    pub fn country(&self) -> &CountryClient {
        &self.country
    }

    pub fn orchestrator(&self) -> Option<&Arc<ImageOrchestrator>> {
        self.orchestrator.as_ref()
    }
}
