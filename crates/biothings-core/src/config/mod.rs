//! Configuration management

pub mod settings;

pub use settings::{CuriePrefix, EntitySettings, MethodAlias, Operation, BUILTIN_CLIENTS};

use crate::error::{BiothingsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Largest page size the services accept for a single query
pub const MAX_PAGE_SIZE: usize = 1000;

/// Main configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory holding the response cache databases
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Per-entity overrides keyed by entity name
    #[serde(default)]
    pub clients: HashMap<String, ClientOverrides>,
}

/// Optional overrides for one entity client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientOverrides {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub step: Option<usize>,
    #[serde(default)]
    pub max_query: Option<usize>,
    #[serde(default)]
    pub delay_secs: Option<f64>,
    #[serde(default)]
    pub scroll_size: Option<usize>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub raise_for_status: Option<bool>,
}

/// Runtime knobs consumed by the batching engine and transports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    pub url: String,

    /// Maximum batch size
    #[serde(default = "default_step")]
    pub step: usize,

    /// Hard cap combined with `step`
    #[serde(default = "default_step")]
    pub max_query: usize,

    /// Pause between live (non-cached) batches, in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,

    /// Page size for `fetch_all` scrolling
    #[serde(default = "default_step")]
    pub scroll_size: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Turn non-success statuses into errors
    #[serde(default = "default_true")]
    pub raise_for_status: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_step() -> usize {
    1000
}

fn default_delay_secs() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("biothings-client-rs/", env!("CARGO_PKG_VERSION"), " (reqwest)").to_string()
}

impl ClientConfig {
    /// Default configuration for an entity, honoring `BIOTHINGS_<ENTITY>_URL`
    pub fn for_settings(settings: &EntitySettings) -> Self {
        let env_key = format!(
            "BIOTHINGS_{}_URL",
            settings.entity.to_uppercase().replace('-', "_")
        );
        let url = std::env::var(env_key).unwrap_or_else(|_| settings.default_url.clone());
        Self::with_url(url)
    }

    /// Default configuration pointing at an explicit URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: normalize_url(url.into()),
            step: default_step(),
            max_query: default_step(),
            delay_secs: default_delay_secs(),
            scroll_size: default_step(),
            timeout_secs: default_timeout(),
            raise_for_status: true,
            user_agent: default_user_agent(),
        }
    }

    /// Apply overrides from the configuration file
    pub fn apply(&mut self, overrides: &ClientOverrides) {
        if let Some(ref url) = overrides.url {
            self.url = normalize_url(url.clone());
        }
        if let Some(step) = overrides.step {
            self.step = step;
        }
        if let Some(max_query) = overrides.max_query {
            self.max_query = max_query;
        }
        if let Some(delay) = overrides.delay_secs {
            self.delay_secs = delay;
        }
        if let Some(scroll_size) = overrides.scroll_size {
            self.scroll_size = scroll_size;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(raise) = overrides.raise_for_status {
            self.raise_for_status = raise;
        }
    }

    /// Pause applied after a live batch
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs.max(0.0)).unwrap_or_default()
    }

    /// Set the inter-batch pause
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay_secs = delay.as_secs_f64();
    }

    /// Batch size actually used: `min(step, max_query)`
    pub fn effective_step(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.step.min(self.max_query)).ok_or_else(|| {
            BiothingsError::Config(format!(
                "step ({}) and max_query ({}) must both be positive",
                self.step, self.max_query
            ))
        })
    }

    /// Validate knob ranges
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(BiothingsError::Config("url must not be empty".to_string()));
        }
        self.effective_step()?;
        if self.scroll_size == 0 {
            return Err(BiothingsError::Config(
                "scroll_size must be positive".to_string(),
            ));
        }
        if Duration::try_from_secs_f64(self.delay_secs).is_err() {
            return Err(BiothingsError::Config(format!(
                "delay_secs must be a non-negative number of seconds, got {}",
                self.delay_secs
            )));
        }
        Ok(())
    }
}

fn normalize_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

impl Config {
    /// Load config from `BIOTHINGS_CONFIG` or the default path
    pub fn load() -> Result<Self> {
        let path = std::env::var("BIOTHINGS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        Self::load_from(&path)
    }

    /// Load config from a file; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Directory for cache databases (`BIOTHINGS_CACHE_DIR` wins over the file)
    pub fn cache_dir(&self) -> PathBuf {
        if let Ok(dir) = std::env::var("BIOTHINGS_CACHE_DIR") {
            return PathBuf::from(dir);
        }
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::CACHE_DIR_NAME)
        })
    }

    /// Cache database path for an entity
    pub fn cache_path(&self, settings: &EntitySettings) -> PathBuf {
        self.cache_dir()
            .join(format!("{}.sqlite", settings.default_cache_file))
    }

    /// Effective client configuration for an entity
    pub fn client_config(&self, settings: &EntitySettings) -> Result<ClientConfig> {
        let mut config = ClientConfig::for_settings(settings);
        if let Some(overrides) = self.clients.get(&settings.entity) {
            config.apply(overrides);
        }
        config.validate()?;
        Ok(config)
    }
}
