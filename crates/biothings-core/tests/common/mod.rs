//! In-process stand-in for a BioThings service
#![allow(dead_code)]

use async_trait::async_trait;
use biothings_core::{
    AsyncTransport, BiothingClient, AsyncBiothingClient, CacheControl, ClientBuilder, HttpResponse,
    Method, Request, Result, Transport,
};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const BASE: &str = "http://mock.biothings.test/v3";

/// A request as seen by the mock, with the caching flag at the time it was sent
#[derive(Debug, Clone)]
pub struct Seen {
    pub request: Request,
    pub caching: bool,
}

pub struct MockTransport {
    seen: Mutex<Vec<Seen>>,
    serve_from_cache: AtomicBool,
    cache_capable: bool,
    caching: AtomicBool,
    not_found: HashSet<String>,
    failing: HashSet<String>,
    hits_per_term: HashMap<String, usize>,
    scroll_total: usize,
    scroll_error_page: Option<usize>,
    scroll_warning_page: Option<usize>,
    biothing_type: Value,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            serve_from_cache: AtomicBool::new(false),
            cache_capable: false,
            caching: AtomicBool::new(false),
            not_found: HashSet::new(),
            failing: HashSet::new(),
            hits_per_term: HashMap::new(),
            scroll_total: 0,
            scroll_error_page: None,
            scroll_warning_page: None,
            biothing_type: json!("gene"),
        }
    }

    /// Report caching support, initially enabled
    pub fn with_caching(mut self) -> Self {
        self.cache_capable = true;
        self.caching = AtomicBool::new(true);
        self
    }

    pub fn not_found(mut self, ids: &[&str]) -> Self {
        self.not_found.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    /// Ids answered with HTTP 500
    pub fn failing(mut self, ids: &[&str]) -> Self {
        self.failing.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn hits_per_term(mut self, term: &str, n: usize) -> Self {
        self.hits_per_term.insert(term.to_string(), n);
        self
    }

    pub fn scroll_total(mut self, total: usize) -> Self {
        self.scroll_total = total;
        self
    }

    /// Answer the n-th scroll page (1-based, first page included) with a soft error
    pub fn scroll_error_on_page(mut self, page: usize) -> Self {
        self.scroll_error_page = Some(page);
        self
    }

    /// Attach a `_warning` to the n-th scroll page, keeping its hits and cursor
    pub fn scroll_warning_on_page(mut self, page: usize) -> Self {
        self.scroll_warning_page = Some(page);
        self
    }

    pub fn biothing_type(mut self, value: Value) -> Self {
        self.biothing_type = value;
        self
    }

    pub fn set_serve_from_cache(&self, cached: bool) {
        self.serve_from_cache.store(cached, Ordering::SeqCst);
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.seen().into_iter().map(|s| s.request).collect()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    fn reply(&self, status: u16, body: Value) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
            from_cache: self.serve_from_cache.load(Ordering::SeqCst),
        }
    }

    fn respond(&self, request: &Request) -> HttpResponse {
        self.seen.lock().unwrap().push(Seen {
            request: request.clone(),
            caching: self.caching.load(Ordering::SeqCst),
        });

        let path = request.url.strip_prefix(BASE).unwrap_or(&request.url).to_string();
        match (request.method, path.as_str()) {
            (Method::Get, "/metadata") => self.reply(
                200,
                json!({"biothing_type": self.biothing_type, "build_version": "20240101"}),
            ),
            (Method::Get, "/metadata/fields") => self.reply(
                200,
                json!({
                    "symbol": {"type": "text", "notes": "official symbol"},
                    "name": {"type": "text"}
                }),
            ),
            (Method::Post, "/gene/") | (Method::Post, "/variant/") => {
                let ids = split_terms(request.param("ids").unwrap_or(""));
                if let Some(bad) = ids.iter().find(|id| self.failing.contains(*id)) {
                    return self.reply(500, json!({"success": false, "error": format!("failed on {}", bad)}));
                }
                let hits: Vec<Value> = ids
                    .iter()
                    .map(|id| {
                        if self.not_found.contains(id) {
                            json!({"query": id, "notfound": true})
                        } else {
                            json!({"query": id, "_id": id, "symbol": format!("SYM{}", id)})
                        }
                    })
                    .collect();
                self.reply(200, Value::Array(hits))
            }
            (Method::Post, "/query/") => {
                let terms = split_terms(request.param("q").unwrap_or(""));
                let mut hits = Vec::new();
                for term in terms {
                    if self.not_found.contains(&term) {
                        hits.push(json!({"query": term, "notfound": true}));
                        continue;
                    }
                    let n = self.hits_per_term.get(&term).copied().unwrap_or(1);
                    for i in 0..n {
                        hits.push(json!({"query": term, "_id": format!("{}-{}", term, i)}));
                    }
                }
                self.reply(200, Value::Array(hits))
            }
            (Method::Get, "/query/") => self.query_page(request),
            (Method::Get, p) if p.starts_with("/gene/") || p.starts_with("/variant/") => {
                let id = p.rsplit('/').next().unwrap_or("");
                if self.failing.contains(id) {
                    self.reply(500, json!({"success": false, "error": "internal"}))
                } else if self.not_found.contains(id) {
                    self.reply(404, json!({"code": 404, "success": false, "error": format!("ID '{}' not found", id)}))
                } else {
                    self.reply(200, json!({"_id": id, "symbol": format!("SYM{}", id)}))
                }
            }
            _ => self.reply(404, json!({"success": false, "error": "no route"})),
        }
    }

    fn query_page(&self, request: &Request) -> HttpResponse {
        let size: usize = request
            .param("size")
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let hit = |i: usize| json!({"_id": format!("hit{}", i), "_score": 1.0});

        let page = if request.param("fetch_all") == Some("true") {
            1
        } else if let Some(scroll_id) = request.param("scroll_id") {
            scroll_id
                .strip_prefix("scroll-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX)
        } else {
            let hits: Vec<Value> = (0..size.min(self.scroll_total)).map(hit).collect();
            return self.reply(200, json!({"total": self.scroll_total, "max_score": 1.0, "hits": hits}));
        };

        if self.scroll_error_page == Some(page) {
            return self.reply(200, json!({"success": false, "error": "Invalid or stale scroll_id"}));
        }

        let start = (page - 1).saturating_mul(size);
        if start >= self.scroll_total && page > 1 {
            return self.reply(200, json!({"success": false, "error": "No results to return."}));
        }
        let end = (start + size).min(self.scroll_total);
        let hits: Vec<Value> = (start..end).map(hit).collect();
        let mut body = json!({
            "total": self.scroll_total,
            "hits": hits,
            "_scroll_id": format!("scroll-{}", page + 1)
        });
        if self.scroll_warning_page == Some(page) {
            body["_warning"] = json!("Scroll request has only partially succeeded");
        }
        self.reply(200, body)
    }
}

fn split_terms(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined
        .split(',')
        .map(|t| t.trim_matches('"').to_string())
        .collect()
}

impl CacheControl for MockTransport {
    fn caching_enabled(&self) -> bool {
        self.caching.load(Ordering::SeqCst)
    }

    fn set_caching(&self, enabled: bool) -> Result<()> {
        if !self.cache_capable {
            return Err(biothings_core::BiothingsError::CachingUnavailable);
        }
        self.caching.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn clear_cache(&self) -> Result<()> {
        if !self.cache_capable {
            return Err(biothings_core::BiothingsError::CachingUnavailable);
        }
        Ok(())
    }

    fn cache_path(&self) -> Option<PathBuf> {
        self.cache_capable.then(|| PathBuf::from("/tmp/mock_cache.sqlite"))
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<HttpResponse> {
        Ok(self.respond(request))
    }
}

#[async_trait]
impl AsyncTransport for MockTransport {
    async fn send_async(&self, request: &Request) -> Result<HttpResponse> {
        Ok(self.respond(request))
    }
}

pub fn builder(entity: &str) -> ClientBuilder {
    ClientBuilder::new(entity)
        .unwrap()
        .url(BASE)
        .delay(Duration::ZERO)
}

pub fn gene_client(mock: MockTransport) -> BiothingClient<MockTransport> {
    builder("gene").build_with(mock).unwrap()
}

pub fn async_gene_client(mock: MockTransport) -> AsyncBiothingClient<MockTransport> {
    builder("gene").build_async_with(mock).unwrap()
}

pub fn ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}", 1000 + i)).collect()
}
