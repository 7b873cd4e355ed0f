use crate::api::ApiClient;
use crate::auth::SessionGuard;
use crate::cache::LocalCache;
use crate::config::AppConfig;
use crate::perf::PerfMonitor;
use crate::storage::Storage;

/// Everything a command needs, built once from configuration
pub struct Context {
    pub config: AppConfig,
    pub storage: Storage,
    pub guard: SessionGuard,
    pub cache: LocalCache,
    pub perf: PerfMonitor,
}

impl Context {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let storage = Storage::new(config.storage_dir()?);
        tracing::debug!("Using storage directory {}", storage.dir().display());

        let guard = SessionGuard::from_config(storage.clone(), &config);
        let cache = LocalCache::new(storage.clone(), config.cache.ttl_ms);
        let perf = PerfMonitor::new(config.performance_monitor);

        Ok(Self {
            config,
            storage,
            guard,
            cache,
            perf,
        })
    }

    /// Session check first, so an expired session never reaches the network
    pub fn authorized_api(&self) -> anyhow::Result<ApiClient> {
        self.guard.require_auth()?;
        Ok(ApiClient::from_config(&self.config)?)
    }
}
