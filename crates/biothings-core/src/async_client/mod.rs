//! Async entity client
//!
//! Same engine and response policy as the blocking client; pacing uses
//! `tokio::time::sleep` and lazy results are `futures` streams. Still one request
//! in flight per call.

mod annotation;
mod query;
mod querymany;

use crate::cache::Suspensions;
use crate::client::common::{strip_notes, ClientCore};
use crate::config::{ClientConfig, EntitySettings, Operation};
use crate::engine::{interpret, Payload, ResponsePolicy};
use crate::error::Result;
use crate::transport::{AsyncHttpTransport, AsyncTransport, Request};
use crate::variant::{self, HgvsFromVcf};
use futures::stream::BoxStream;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Lazy stream of hits; a failure is yielded once and ends the stream
pub type HitStream<'a> = BoxStream<'a, Result<Value>>;

/// Async client for one BioThings entity service
pub struct AsyncBiothingClient<T = AsyncHttpTransport> {
    core: ClientCore,
    transport: T,
    suspensions: Suspensions,
}

impl<T: AsyncTransport> AsyncBiothingClient<T> {
    pub fn with_transport(settings: EntitySettings, config: ClientConfig, transport: T) -> Result<Self> {
        Ok(Self {
            core: ClientCore::new(settings, config)?,
            transport,
            suspensions: Suspensions::default(),
        })
    }

    pub fn settings(&self) -> &EntitySettings {
        &self.core.settings
    }

    pub fn config(&self) -> &ClientConfig {
        &self.core.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self) -> &str {
        &self.core.config.url
    }

    pub fn use_http(&mut self) {
        self.core.set_scheme(false);
    }

    pub fn use_https(&mut self) {
        self.core.set_scheme(true);
    }

    async fn fetch(&self, request: &Request, policy: ResponsePolicy) -> Result<(bool, Option<Payload>)> {
        let response = self.transport.send_async(request).await?;
        let from_cache = response.from_cache;
        Ok((from_cache, interpret(&request.url, response, policy)?))
    }

    async fn fetch_json(&self, request: &Request) -> Result<(bool, Value)> {
        let (from_cache, payload) = self.fetch(request, self.core.policy()).await?;
        let value = match payload {
            Some(payload) => payload.into_json(&request.url)?,
            None => Value::Null,
        };
        Ok((from_cache, value))
    }

    pub async fn metadata(&self) -> Result<Value> {
        Ok(self.fetch_json(&self.core.metadata_request()).await?.1)
    }

    pub async fn get_fields(&self, search: Option<&str>) -> Result<Value> {
        let (_, fields) = self.fetch_json(&self.core.fields_request(search)).await?;
        Ok(strip_notes(fields))
    }

    pub fn caching_enabled(&self) -> bool {
        self.transport.caching_enabled()
    }

    pub fn set_caching(&self) -> Result<()> {
        if self.transport.caching_enabled() {
            tracing::warn!("Caching already enabled. Skipping for now ...");
            return Ok(());
        }
        self.transport.set_caching(true)?;
        tracing::info!(
            "Enabled client caching; future queries will be cached in {:?}",
            self.transport.cache_path()
        );
        Ok(())
    }

    pub fn stop_caching(&self) -> Result<()> {
        self.transport.clear_cache()?;
        self.transport.set_caching(false)?;
        tracing::info!("Disabled client caching");
        Ok(())
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.transport.clear_cache()
    }

    pub fn cache_path(&self) -> Option<PathBuf> {
        self.transport.cache_path()
    }

    pub fn get_hgvs_from_vcf(&self, path: &Path) -> Result<HgvsFromVcf<BufReader<File>>> {
        self.core.require(Operation::HgvsFromVcf, "get_hgvs_from_vcf")?;
        variant::hgvs_from_vcf_file(path)
    }

    pub fn format_hgvs(&self, chrom: &str, pos: u64, ref_: &str, alt: &str) -> Result<String> {
        self.core.require(Operation::FormatHgvs, "format_hgvs")?;
        variant::format_hgvs(chrom, pos, ref_, alt)
    }
}

impl<T> std::fmt::Debug for AsyncBiothingClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(&format!("Async{}", self.core.settings.type_name))
            .field("url", &self.core.config.url)
            .finish()
    }
}
