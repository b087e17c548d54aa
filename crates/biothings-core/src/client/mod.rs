//! Blocking entity client
//!
//! [`BiothingClient`] binds an [`EntitySettings`] record to a [`Transport`] and
//! drives the batching engine with blocking I/O. Pacing uses thread sleeps.

mod annotation;
pub(crate) mod common;
mod query;
mod querymany;

pub use annotation::AnnotationIter;
pub use query::ScrollIter;

use crate::cache::Suspensions;
use crate::config::{ClientConfig, EntitySettings, Operation};
use crate::engine::{interpret, Payload, ResponsePolicy};
use crate::error::Result;
use crate::transport::{HttpTransport, Request, Transport};
use crate::variant::{self, HgvsFromVcf};
use common::ClientCore;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Blocking client for one BioThings entity service
pub struct BiothingClient<T = HttpTransport> {
    core: ClientCore,
    transport: T,
    suspensions: Suspensions,
}

impl<T: Transport> BiothingClient<T> {
    /// Build a client over an explicit transport
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

    /// Base URL of the service
    pub fn url(&self) -> &str {
        &self.core.config.url
    }

    pub fn use_http(&mut self) {
        self.core.set_scheme(false);
    }

    pub fn use_https(&mut self) {
        self.core.set_scheme(true);
    }

    /// Send one request and apply the response policy
    fn fetch(&self, request: &Request, policy: ResponsePolicy) -> Result<(bool, Option<Payload>)> {
        let response = self.transport.send(request)?;
        let from_cache = response.from_cache;
        Ok((from_cache, interpret(&request.url, response, policy)?))
    }

    fn fetch_json(&self, request: &Request) -> Result<(bool, Value)> {
        let (from_cache, payload) = self.fetch(request, self.core.policy())?;
        let value = match payload {
            Some(payload) => payload.into_json(&request.url)?,
            None => Value::Null,
        };
        Ok((from_cache, value))
    }

    /// Service metadata
    pub fn metadata(&self) -> Result<Value> {
        Ok(self.fetch_json(&self.core.metadata_request())?.1)
    }

    /// Available fields, optionally filtered by a case-insensitive search term
    pub fn get_fields(&self, search: Option<&str>) -> Result<Value> {
        let (_, fields) = self.fetch_json(&self.core.fields_request(search))?;
        Ok(common::strip_notes(fields))
    }

    pub fn caching_enabled(&self) -> bool {
        self.transport.caching_enabled()
    }

    /// Enable response caching for future requests
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

    /// Clear the cache and disable caching
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

    /// Lazily convert a VCF file into genomic HGVS ids
    pub fn get_hgvs_from_vcf(&self, path: &Path) -> Result<HgvsFromVcf<BufReader<File>>> {
        self.core.require(Operation::HgvsFromVcf, "get_hgvs_from_vcf")?;
        variant::hgvs_from_vcf_file(path)
    }

    /// Genomic HGVS id for one VCF-style record
    pub fn format_hgvs(&self, chrom: &str, pos: u64, ref_: &str, alt: &str) -> Result<String> {
        self.core.require(Operation::FormatHgvs, "format_hgvs")?;
        variant::format_hgvs(chrom, pos, ref_, alt)
    }
}

impl<T> std::fmt::Debug for BiothingClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(&self.core.settings.type_name)
            .field("url", &self.core.config.url)
            .finish()
    }
}
