//! Shared application state.

use std::sync::Arc;

use assetvault_common::Currency;
use assetvault_fx::{
    FxEngine, FxEngineConfig, HttpProviderConfig, HttpRateProvider, RateCacheConfig,
};
use assetvault_store::{seed_demo_users, MemoryStore, PgStore, SharedStore};
use tracing::info;

use crate::config::ServerConfig;
use crate::service::AssetService;
use crate::valuation::Valuation;

/// Everything a request handler needs.
pub struct AppState {
    pub assets: AssetService,
    pub valuation: Valuation,
    pub fx: Arc<FxEngine>,
    /// Currency the value endpoints report in.
    pub reference_currency: Currency,
}

impl AppState {
    pub fn new(store: SharedStore, fx: Arc<FxEngine>, reference_currency: Currency) -> Self {
        Self {
            assets: AssetService::new(store.clone()),
            valuation: Valuation::new(store, fx.clone()),
            fx,
            reference_currency,
        }
    }
}

/// Open the configured store and rate source.
pub async fn build_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections).await?;
            store.migrate().await?;
            Arc::new(store)
        }
        None => {
            info!("DATABASE_URL not set, keeping records in memory");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_users {
        seed_demo_users(store.as_ref()).await?;
    }

    let provider = HttpRateProvider::new(HttpProviderConfig {
        base_url: config.rates.source_url.clone(),
        request_timeout: config.rates.request_timeout,
    })?;

    let fx_config = FxEngineConfig {
        cache: RateCacheConfig {
            ttl: chrono::Duration::from_std(config.rates.cache_ttl)?,
        },
        use_cache: true,
    };
    let fx = Arc::new(FxEngine::new(Arc::new(provider), fx_config));

    info!(
        store = store.backend(),
        rate_source = fx.provider_name(),
        reference_currency = %config.reference_currency,
        "Application state ready"
    );

    Ok(Arc::new(AppState::new(
        store,
        fx,
        config.reference_currency.clone(),
    )))
}
