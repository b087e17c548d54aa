//! Local HTTP response cache
//!
//! Responses are stored in SQLite keyed by a SHA-256 digest of the request
//! (method, URL and sorted parameters). Only `200` responses are cached.

mod guard;

pub use guard::{CachingGuard, Suspensions};

use crate::error::Result;
use crate::transport::{AsyncTransport, CacheControl, HttpResponse, Request, Transport};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS responses (
    key TEXT PRIMARY KEY,
    method TEXT NOT NULL,
    url TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// SQLite-backed response store
pub struct ResponseCache {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl ResponseCache {
    /// Open or create a cache database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn, path.to_path_buf())
    }

    /// Non-persistent cache, mostly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, PathBuf::from(":memory:"))
    }

    fn init(conn: Connection, path: PathBuf) -> Result<Self> {
        conn.execute_batch(CREATE_TABLES)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cache key of a request
    pub fn key(request: &Request) -> String {
        let mut params: Vec<&(String, String)> = request.params.iter().collect();
        params.sort();

        let mut hasher = Sha256::new();
        hasher.update(request.method.to_string().as_bytes());
        hasher.update(b"\n");
        hasher.update(request.url.as_bytes());
        for (k, v) in params {
            hasher.update(b"\n");
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let body = self
            .conn()
            .query_row(
                "SELECT body FROM responses WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }

    pub fn put(&self, key: &str, request: &Request, body: &str) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO responses (key, method, url, body, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                key,
                request.method.to_string(),
                request.url,
                body,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Remove every stored response and compact the file
    pub fn clear(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM responses", [])?;
        conn.execute_batch("VACUUM")?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Transport decorator serving repeated requests from a [`ResponseCache`]
pub struct CachedTransport<T> {
    inner: T,
    cache: ResponseCache,
    enabled: AtomicBool,
}

impl<T> CachedTransport<T> {
    /// Wrap `inner`; caching starts enabled
    pub fn new(inner: T, cache: ResponseCache) -> Self {
        Self {
            inner,
            cache,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn lookup(&self, request: &Request) -> Result<Option<HttpResponse>> {
        if !self.caching_enabled() {
            return Ok(None);
        }
        let hit = self.cache.get(&ResponseCache::key(request))?;
        if hit.is_some() {
            tracing::debug!("cache hit: {} {}", request.method, request.url);
        }
        Ok(hit.map(|body| HttpResponse {
            status: 200,
            body,
            from_cache: true,
        }))
    }

    fn store(&self, request: &Request, response: &HttpResponse) -> Result<()> {
        if self.caching_enabled() && response.status == 200 {
            self.cache
                .put(&ResponseCache::key(request), request, &response.body)?;
        }
        Ok(())
    }
}

impl<T> CacheControl for CachedTransport<T> {
    fn caching_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_caching(&self, enabled: bool) -> Result<()> {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }

    fn cache_path(&self) -> Option<PathBuf> {
        Some(self.cache.path().to_path_buf())
    }
}

impl<T: Transport> Transport for CachedTransport<T> {
    fn send(&self, request: &Request) -> Result<HttpResponse> {
        if let Some(hit) = self.lookup(request)? {
            return Ok(hit);
        }
        let response = self.inner.send(request)?;
        self.store(request, &response)?;
        Ok(response)
    }
}

#[async_trait]
impl<T: AsyncTransport> AsyncTransport for CachedTransport<T> {
    async fn send_async(&self, request: &Request) -> Result<HttpResponse> {
        if let Some(hit) = self.lookup(request)? {
            return Ok(hit);
        }
        let response = self.inner.send_async(request).await?;
        self.store(request, &response)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Method;
    use std::sync::atomic::AtomicUsize;

    struct Counting {
        calls: AtomicUsize,
        status: u16,
    }

    impl CacheControl for Counting {}

    impl Transport for Counting {
        fn send(&self, request: &Request) -> Result<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: self.status,
                body: format!("{{\"url\": \"{}\"}}", request.url),
                from_cache: false,
            })
        }
    }

    fn counting(status: u16) -> CachedTransport<Counting> {
        CachedTransport::new(
            Counting {
                calls: AtomicUsize::new(0),
                status,
            },
            ResponseCache::in_memory().unwrap(),
        )
    }

    #[test]
    fn test_key_ignores_param_order() {
        let a = Request::get("http://x/query/").with_params(vec![
            ("q".to_string(), "cdk2".to_string()),
            ("size".to_string(), "10".to_string()),
        ]);
        let b = Request::get("http://x/query/").with_params(vec![
            ("size".to_string(), "10".to_string()),
            ("q".to_string(), "cdk2".to_string()),
        ]);
        assert_eq!(ResponseCache::key(&a), ResponseCache::key(&b));

        let post = Request {
            method: Method::Post,
            ..a.clone()
        };
        assert_ne!(ResponseCache::key(&a), ResponseCache::key(&post));
    }

    #[test]
    fn test_second_request_served_from_cache() {
        let transport = counting(200);
        let req = Request::get("http://x/gene/1017");

        let first = transport.send(&req).unwrap();
        assert!(!first.from_cache);
        let second = transport.send(&req).unwrap();
        assert!(second.from_cache);
        assert_eq!(first.body, second.body);
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_errors_not_cached() {
        let transport = counting(500);
        let req = Request::get("http://x/gene/1017");
        transport.send(&req).unwrap();
        transport.send(&req).unwrap();
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 2);
        assert!(transport.cache().is_empty().unwrap());
    }

    #[test]
    fn test_disabled_bypasses_cache() {
        let transport = counting(200);
        let req = Request::get("http://x/gene/1017");
        transport.set_caching(false).unwrap();
        transport.send(&req).unwrap();
        transport.send(&req).unwrap();
        assert_eq!(transport.inner().calls.load(Ordering::SeqCst), 2);
        assert!(transport.cache().is_empty().unwrap());
    }

    #[test]
    fn test_clear_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mygene_cache.sqlite");
        let cache = ResponseCache::open(&path).unwrap();
        let req = Request::get("http://x/gene/1017");
        cache.put(&ResponseCache::key(&req), &req, "{}").unwrap();
        assert_eq!(cache.len().unwrap(), 1);
        assert!(path.exists());

        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
        assert_eq!(cache.path(), path.as_path());
    }
}
