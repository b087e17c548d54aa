//! Transport abstraction
//!
//! A transport issues exactly one GET or POST and reports whether the response was
//! served from a local cache. Status handling is left to the engine so that the
//! blocking and async clients share one response policy.

mod http;

pub use http::{AsyncHttpTransport, HttpTransport};

use crate::error::{BiothingsError, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// HTTP method used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A single outgoing request
///
/// GET parameters travel in the query string, POST parameters as a form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            params: Vec::new(),
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Append parameters, keeping their order
    pub fn with_params(mut self, params: impl IntoIterator<Item = (String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Value of the first parameter with the given name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Response as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub from_cache: bool,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Cache controls exposed by a transport
///
/// Transports without a cache layer keep the defaults: caching reports as disabled
/// and any attempt to change it fails with [`BiothingsError::CachingUnavailable`].
pub trait CacheControl {
    fn caching_enabled(&self) -> bool {
        false
    }

    fn set_caching(&self, _enabled: bool) -> Result<()> {
        Err(BiothingsError::CachingUnavailable)
    }

    fn clear_cache(&self) -> Result<()> {
        Err(BiothingsError::CachingUnavailable)
    }

    fn cache_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Blocking transport
pub trait Transport: CacheControl + Send + Sync {
    fn send(&self, request: &Request) -> Result<HttpResponse>;
}

/// Async transport
#[async_trait]
pub trait AsyncTransport: CacheControl + Send + Sync {
    async fn send_async(&self, request: &Request) -> Result<HttpResponse>;
}

impl<T: CacheControl + ?Sized> CacheControl for Box<T> {
    fn caching_enabled(&self) -> bool {
        (**self).caching_enabled()
    }

    fn set_caching(&self, enabled: bool) -> Result<()> {
        (**self).set_caching(enabled)
    }

    fn clear_cache(&self) -> Result<()> {
        (**self).clear_cache()
    }

    fn cache_path(&self) -> Option<PathBuf> {
        (**self).cache_path()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &Request) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

#[async_trait]
impl<T: AsyncTransport + ?Sized> AsyncTransport for Box<T> {
    async fn send_async(&self, request: &Request) -> Result<HttpResponse> {
        (**self).send_async(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;
    impl CacheControl for Bare {}

    #[test]
    fn test_request_builder() {
        let req = Request::post("https://mygene.info/v3/gene/")
            .with_params(vec![("ids".to_string(), "\"1017\"".to_string())]);
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.param("ids"), Some("\"1017\""));
        assert_eq!(req.param("fields"), None);
        assert_eq!(req.method.to_string(), "POST");
    }

    #[test]
    fn test_default_cache_control() {
        let bare = Bare;
        assert!(!bare.caching_enabled());
        assert!(matches!(
            bare.set_caching(true),
            Err(BiothingsError::CachingUnavailable)
        ));
        assert!(bare.clear_cache().is_err());
        assert!(bare.cache_path().is_none());
    }

    #[test]
    fn test_boxed_cache_control_delegates() {
        let boxed: Box<dyn CacheControl> = Box::new(Bare);
        assert!(!boxed.caching_enabled());
        assert!(boxed.clear_cache().is_err());
    }

    #[test]
    fn test_success_range() {
        let ok = HttpResponse {
            status: 204,
            body: String::new(),
            from_cache: false,
        };
        assert!(ok.is_success());
        let missing = HttpResponse {
            status: 404,
            ..ok
        };
        assert!(!missing.is_success());
    }
}
