//! Client construction
//!
//! A [`ClientBuilder`] pairs entity settings with a [`ClientConfig`] and produces a
//! blocking or async client over a plain, cached or caller-supplied transport.

use crate::async_client::AsyncBiothingClient;
use crate::cache::{CachedTransport, ResponseCache};
use crate::client::common::discovered_type;
use crate::client::BiothingClient;
use crate::config::{ClientConfig, Config, EntitySettings};
use crate::engine::{interpret, ResponsePolicy};
use crate::error::Result;
use crate::transport::{AsyncHttpTransport, AsyncTransport, HttpTransport, Request, Transport};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Blocking client with a SQLite response cache
pub type CachedClient = BiothingClient<CachedTransport<HttpTransport>>;

/// Async client with a SQLite response cache
pub type AsyncCachedClient = AsyncBiothingClient<CachedTransport<AsyncHttpTransport>>;

#[derive(Debug, Clone)]
pub struct ClientBuilder {
    settings: EntitySettings,
    config: ClientConfig,
    cache_dir: Option<PathBuf>,
}

impl ClientBuilder {
    /// Builder for a built-in entity with default configuration
    pub fn new(biothing_type: &str) -> Result<Self> {
        let settings = EntitySettings::resolve(biothing_type, None)?;
        Ok(Self::from_settings(settings))
    }

    /// Builder for an entity at an explicit URL; unknown entities get generated settings
    pub fn with_url(biothing_type: &str, url: &str) -> Result<Self> {
        let settings = EntitySettings::resolve(biothing_type, Some(url))?;
        Ok(Self::from_settings(settings).url(url))
    }

    pub fn from_settings(settings: EntitySettings) -> Self {
        let config = ClientConfig::for_settings(&settings);
        Self {
            settings,
            config,
            cache_dir: None,
        }
    }

    /// Builder honoring the overrides of a configuration file
    pub fn from_config(biothing_type: &str, file: &Config) -> Result<Self> {
        let settings = EntitySettings::resolve(biothing_type, None)?;
        let config = file.client_config(&settings)?;
        Ok(Self {
            settings,
            config,
            cache_dir: Some(file.cache_dir()),
        })
    }

    pub fn settings(&self) -> &EntitySettings {
        &self.settings
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(mut self, url: &str) -> Self {
        self.config.url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn step(mut self, step: usize) -> Self {
        self.config.step = step;
        self
    }

    pub fn max_query(mut self, max_query: usize) -> Self {
        self.config.max_query = max_query;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.set_delay(delay);
        self
    }

    pub fn scroll_size(mut self, scroll_size: usize) -> Self {
        self.config.scroll_size = scroll_size;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.config.timeout_secs = timeout_secs;
        self
    }

    pub fn raise_for_status(mut self, raise: bool) -> Self {
        self.config.raise_for_status = raise;
        self
    }

    /// Default cache database for this entity
    pub fn default_cache_path(&self) -> PathBuf {
        let file = Config {
            cache_dir: self.cache_dir.clone(),
            ..Config::default()
        };
        file.cache_path(&self.settings)
    }

    pub fn build(self) -> Result<BiothingClient> {
        let transport = HttpTransport::new(&self.config)?;
        self.build_with(transport)
    }

    /// Blocking client caching responses in `path` (or the default cache file)
    pub fn build_cached(self, path: Option<&Path>) -> Result<CachedClient> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| self.default_cache_path());
        let cache = ResponseCache::open(&path)?;
        let transport = CachedTransport::new(HttpTransport::new(&self.config)?, cache);
        self.build_with(transport)
    }

    pub fn build_with<T: Transport>(self, transport: T) -> Result<BiothingClient<T>> {
        tracing::debug!("building {} client for {}", self.settings.type_name, self.config.url);
        BiothingClient::with_transport(self.settings, self.config, transport)
    }

    pub fn build_async(self) -> Result<AsyncBiothingClient> {
        let transport = AsyncHttpTransport::new(&self.config)?;
        self.build_async_with(transport)
    }

    pub fn build_async_cached(self, path: Option<&Path>) -> Result<AsyncCachedClient> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(|| self.default_cache_path());
        let cache = ResponseCache::open(&path)?;
        let transport = CachedTransport::new(AsyncHttpTransport::new(&self.config)?, cache);
        self.build_async_with(transport)
    }

    pub fn build_async_with<T: AsyncTransport>(self, transport: T) -> Result<AsyncBiothingClient<T>> {
        tracing::debug!("building async {} client for {}", self.settings.type_name, self.config.url);
        AsyncBiothingClient::with_transport(self.settings, self.config, transport)
    }
}

/// Blocking client for a built-in entity, honoring the user configuration file
pub fn get_client(biothing_type: &str) -> Result<BiothingClient> {
    let file = Config::load()?;
    ClientBuilder::from_config(biothing_type, &file)?.build()
}

/// Async client for a built-in entity, honoring the user configuration file
pub fn get_async_client(biothing_type: &str) -> Result<AsyncBiothingClient> {
    let file = Config::load()?;
    ClientBuilder::from_config(biothing_type, &file)?.build_async()
}

fn metadata_url(url: &str) -> String {
    format!("{}/metadata", url.trim_end_matches('/'))
}

fn builder_for_discovered(url: &str, metadata: &serde_json::Value) -> Result<ClientBuilder> {
    let biothing_type = discovered_type(metadata)?;
    tracing::info!("discovered biothing type '{}' at {}", biothing_type, url);
    ClientBuilder::with_url(&biothing_type, url)
}

/// Builder for the service at `url`, reading its entity type from `<url>/metadata`
pub fn discover_with<T: Transport>(url: &str, transport: &T) -> Result<ClientBuilder> {
    let request = Request::get(metadata_url(url));
    let response = transport.send(&request)?;
    let metadata = interpret(&request.url, response, ResponsePolicy::json(true))?
        .map(|p| p.into_json(&request.url))
        .transpose()?
        .unwrap_or_default();
    builder_for_discovered(url, &metadata)
}

/// Blocking discovery over a default HTTP transport
pub fn discover(url: &str) -> Result<ClientBuilder> {
    let transport = HttpTransport::new(&ClientConfig::with_url(url))?;
    discover_with(url, &transport)
}

pub async fn discover_async_with<T: AsyncTransport>(url: &str, transport: &T) -> Result<ClientBuilder> {
    let request = Request::get(metadata_url(url));
    let response = transport.send_async(&request).await?;
    let metadata = interpret(&request.url, response, ResponsePolicy::json(true))?
        .map(|p| p.into_json(&request.url))
        .transpose()?
        .unwrap_or_default();
    builder_for_discovered(url, &metadata)
}

pub async fn discover_async(url: &str) -> Result<ClientBuilder> {
    let transport = AsyncHttpTransport::new(&ClientConfig::with_url(url))?;
    discover_async_with(url, &transport).await
}
