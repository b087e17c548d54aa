//! reqwest-backed transports

use super::{AsyncTransport, CacheControl, HttpResponse, Method, Request, Transport};
use crate::config::ClientConfig;
use crate::error::{BiothingsError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Blocking HTTP transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(BiothingsError::Http)?;
        Ok(Self { client })
    }
}

impl CacheControl for HttpTransport {}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<HttpResponse> {
        tracing::debug!("{} {}", request.method, request.url);
        let builder = match request.method {
            Method::Get => self.client.get(&request.url).query(&request.params),
            Method::Post => self.client.post(&request.url).form(&request.params),
        };
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse {
            status,
            body,
            from_cache: false,
        })
    }
}

/// Async HTTP transport
pub struct AsyncHttpTransport {
    client: reqwest::Client,
}

impl AsyncHttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(BiothingsError::Http)?;
        Ok(Self { client })
    }
}

impl CacheControl for AsyncHttpTransport {}

#[async_trait]
impl AsyncTransport for AsyncHttpTransport {
    async fn send_async(&self, request: &Request) -> Result<HttpResponse> {
        tracing::debug!("{} {}", request.method, request.url);
        let builder = match request.method {
            Method::Get => self.client.get(&request.url).query(&request.params),
            Method::Post => self.client.post(&request.url).form(&request.params),
        };
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse {
            status,
            body,
            from_cache: false,
        })
    }
}
