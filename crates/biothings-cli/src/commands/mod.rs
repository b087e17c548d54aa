//! CLI command handlers

pub mod cache;
pub mod call;
pub mod clients;
pub mod get;
pub mod hgvs;
pub mod metadata;
pub mod query;

use anyhow::Result;
use biothings_core::{
    discover_async, AsyncBiothingClient, AsyncHttpTransport, AsyncTransport, CachedTransport,
    ClientBuilder, Config, ResponseCache,
};
use std::io::BufRead;

/// Async client over a plain or cached transport
pub type Client = AsyncBiothingClient<Box<dyn AsyncTransport>>;

/// Global options affecting how a client is built
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub url: Option<String>,
    pub cache: bool,
    pub step: Option<usize>,
}

fn is_url(entity: &str) -> bool {
    entity.starts_with("http://") || entity.starts_with("https://")
}

/// Builder for an entity name or, given a URL, the service discovered there
pub async fn builder(entity: &str, opts: &ClientOptions) -> Result<ClientBuilder> {
    let builder = if is_url(entity) {
        discover_async(entity).await?
    } else {
        let file = Config::load()?;
        match &opts.url {
            Some(url) => ClientBuilder::from_config(entity, &file)
                .map(|b| b.url(url))
                .or_else(|_| ClientBuilder::with_url(entity, url))?,
            None => ClientBuilder::from_config(entity, &file)?,
        }
    };
    Ok(match opts.step {
        Some(step) => builder.step(step),
        None => builder,
    })
}

pub async fn client(entity: &str, opts: &ClientOptions) -> Result<Client> {
    let builder = builder(entity, opts).await?;
    let http = AsyncHttpTransport::new(builder.config())?;
    let transport: Box<dyn AsyncTransport> = if opts.cache {
        let cache = ResponseCache::open(&builder.default_cache_path())?;
        tracing::info!("caching responses in {}", cache.path().display());
        Box::new(CachedTransport::new(http, cache))
    } else {
        Box::new(http)
    };
    Ok(builder.build_async_with(transport)?)
}

/// Positional values, or stdin lines when none were given
pub fn args_or_stdin(values: Vec<String>) -> Result<Vec<String>> {
    if !values.is_empty() {
        return Ok(values);
    }
    let stdin = std::io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}
