//! Biothings Core Library
//!
//! Clients for BioThings-style annotation services (mygene.info, myvariant.info,
//! mychem.info, ...).
//!
//! # Features
//! - Per-entity clients built from declarative settings with method aliases
//! - Batched, paced retrieval of large id and query-term lists
//! - Lazy results (iterators and streams) and `fetch_all` scroll pagination
//! - Optional SQLite response cache
//! - Tabular conversion with CSV export, CURIE id normalization, VCF to HGVS

pub mod async_client;
pub mod cache;
pub mod client;
pub mod config;
pub mod curie;
pub mod engine;
pub mod error;
pub mod factory;
pub mod options;
pub mod output;
pub mod table;
pub mod transport;
pub mod variant;

pub use async_client::{AsyncBiothingClient, HitStream};
pub use cache::{CachedTransport, CachingGuard, ResponseCache, Suspensions};
pub use client::{AnnotationIter, BiothingClient, ScrollIter};
pub use config::{
    ClientConfig, ClientOverrides, Config, CuriePrefix, EntitySettings, MethodAlias, Operation,
    BUILTIN_CLIENTS,
};
pub use curie::CurieTransformer;
pub use engine::{IntoTerms, Terms};
pub use error::{BiothingsError, Error, Result};
pub use factory::{
    discover, discover_async, discover_async_with, discover_with, get_async_client, get_client,
    AsyncCachedClient, CachedClient, ClientBuilder,
};
pub use options::{GetManyOptions, GetOptions, QueryManyOptions, QueryOptions};
pub use output::{Annotations, QueryMany, QueryManyReport, QueryOutput, RawOutput, Records};
pub use table::{DataFrameMode, Table};
pub use transport::{
    AsyncHttpTransport, AsyncTransport, CacheControl, HttpResponse, HttpTransport, Method,
    Request, Transport,
};
pub use variant::{format_hgvs, HgvsFromVcf};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "biothings";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "biothings";
