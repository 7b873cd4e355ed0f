use crate::error::AppError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
    pub storage: StorageConfig,
    pub debug_logging: bool,
    pub performance_monitor: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Production unless development is asked for explicitly
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("development") | Some("dev") => Environment::Development,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub pin: String,
    pub session_timeout_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub ttl_ms: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub page_size: usize,
    pub ranking_limit: usize,
    pub ranking_threshold: u32,
    pub search_debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub dir: Option<PathBuf>,
}

/// Optional YAML overlay; every field may be omitted
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    pin: Option<String>,
    session_timeout_ms: Option<i64>,
    cache_ttl_ms: Option<i64>,
    page_size: Option<usize>,
    ranking_limit: Option<usize>,
    ranking_threshold: Option<u32>,
    search_debounce_ms: Option<u64>,
    storage_dir: Option<PathBuf>,
    debug_logging: Option<bool>,
    performance_monitor: Option<bool>,
}

impl AppConfig {
    /// Fails only when a config file was named and cannot be used
    pub fn from_env() -> Result<Self, AppError> {
        let environment = Environment::parse(env::var("LATECHECK_ENV").ok().as_deref());

        // Preset, then config file, then individual env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        };

        let config = match env::var("LATECHECK_CONFIG_FILE") {
            Ok(path) => config.with_file_overrides(&path)?,
            Err(_) => config,
        };

        Ok(config.with_env_overrides())
    }

    fn with_file_overrides(mut self, path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read config file '{}': {}", path, e)))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| AppError::config(format!("invalid config file '{}': {}", path, e)))?;

        if file.api_url.is_some() {
            self.api.url = file.api_url;
        }
        if let Some(v) = file.pin {
            self.auth.pin = v;
        }
        if let Some(v) = file.session_timeout_ms {
            self.auth.session_timeout_ms = v;
        }
        if let Some(v) = file.cache_ttl_ms {
            self.cache.ttl_ms = v;
        }
        if let Some(v) = file.page_size {
            self.display.page_size = v;
        }
        if let Some(v) = file.ranking_limit {
            self.display.ranking_limit = v;
        }
        if let Some(v) = file.ranking_threshold {
            self.display.ranking_threshold = v;
        }
        if let Some(v) = file.search_debounce_ms {
            self.display.search_debounce_ms = v;
        }
        if file.storage_dir.is_some() {
            self.storage.dir = file.storage_dir;
        }
        if let Some(v) = file.debug_logging {
            self.debug_logging = v;
        }
        if let Some(v) = file.performance_monitor {
            self.performance_monitor = v;
        }

        Ok(self)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("LATECHECK_API_URL") {
            // Deployment URLs are often pasted with stray whitespace
            self.api.url = Some(v.trim().to_string());
        }

        if let Ok(v) = env::var("LATECHECK_PIN") {
            self.auth.pin = v;
        }
        if let Ok(v) = env::var("LATECHECK_SESSION_TIMEOUT_MS") {
            self.auth.session_timeout_ms = v.parse().unwrap_or(self.auth.session_timeout_ms);
        }

        if let Ok(v) = env::var("LATECHECK_CACHE_TTL_MS") {
            self.cache.ttl_ms = v.parse().unwrap_or(self.cache.ttl_ms);
        }

        if let Ok(v) = env::var("LATECHECK_PAGE_SIZE") {
            self.display.page_size = v.parse().unwrap_or(self.display.page_size);
        }
        if let Ok(v) = env::var("LATECHECK_RANKING_LIMIT") {
            self.display.ranking_limit = v.parse().unwrap_or(self.display.ranking_limit);
        }
        if let Ok(v) = env::var("LATECHECK_RANKING_THRESHOLD") {
            self.display.ranking_threshold = v.parse().unwrap_or(self.display.ranking_threshold);
        }
        if let Ok(v) = env::var("LATECHECK_SEARCH_DEBOUNCE_MS") {
            self.display.search_debounce_ms = v.parse().unwrap_or(self.display.search_debounce_ms);
        }

        if let Ok(v) = env::var("LATECHECK_STORAGE_DIR") {
            self.storage.dir = Some(PathBuf::from(v));
        }

        if let Ok(v) = env::var("LATECHECK_DEBUG_LOGGING") {
            self.debug_logging = v.parse().unwrap_or(self.debug_logging);
        }
        if let Ok(v) = env::var("LATECHECK_PERFORMANCE_MONITOR") {
            self.performance_monitor = v.parse().unwrap_or(self.performance_monitor);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig { url: None },
            auth: AuthConfig {
                pin: "1234".to_string(),
                session_timeout_ms: 60 * 60 * 1000, // 1 hour
            },
            cache: CacheConfig {
                ttl_ms: 60 * 60 * 1000,
            },
            display: DisplayConfig {
                page_size: 50,
                ranking_limit: 10,
                ranking_threshold: 1,
                search_debounce_ms: 300,
            },
            storage: StorageConfig { dir: None },
            debug_logging: true,
            performance_monitor: false,
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            debug_logging: false,
            ..Self::development()
        }
    }

    /// Directory holding the persisted JSON keys
    pub fn storage_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.storage.dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let home = env::var("HOME")
                    .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
                Ok(PathBuf::from(home).join(".config").join("latecheck").join("storage"))
            }
        }
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug_logging {
            "latecheck=debug"
        } else {
            "warn"
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<Result<AppConfig, AppError>> = Lazy::new(AppConfig::from_env);

pub fn config() -> Result<&'static AppConfig, AppError> {
    CONFIG.as_ref().map_err(Clone::clone)
}
