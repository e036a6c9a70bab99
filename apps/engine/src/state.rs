use std::sync::{Arc, RwLock};

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::providers::{
    ContentProvider, ExternalAiProvider, FallbackChain, LocalEngineProvider, StaticMockProvider,
};
use crate::version::SystemVersion;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Text providers in priority order: local engine, external AI (if configured), mock.
    pub chain: Arc<FallbackChain>,
    /// The only mutable engine state. Replaced wholesale on upgrade.
    pub version: Arc<RwLock<SystemVersion>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let mut providers: Vec<Arc<dyn ContentProvider>> =
            vec![Arc::new(LocalEngineProvider::new(config.simulate_latency))];

        if let Some(api_key) = &config.gemini_api_key {
            let external = ExternalAiProvider::new(api_key.clone(), config.gemini_model.clone())?
                .with_base_url(config.gemini_base_url.clone());
            providers.push(Arc::new(external));
            info!("External AI provider enabled (model: {})", config.gemini_model);
        }
        providers.push(Arc::new(StaticMockProvider));

        let chain = FallbackChain::new(providers);
        info!("Provider chain: {}", chain.names().join(" -> "));

        Ok(Self {
            config,
            chain: Arc::new(chain),
            version: Arc::new(RwLock::new(SystemVersion::initial(Utc::now()))),
        })
    }
}
