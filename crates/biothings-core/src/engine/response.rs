//! Response policy shared by the blocking and async clients

use crate::error::{BiothingsError, Result};
use crate::transport::HttpResponse;
use serde_json::Value;

/// How a transport response is turned into a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePolicy {
    /// Non-success statuses become [`BiothingsError::Status`]
    pub raise_for_status: bool,
    /// A 404 yields no payload instead of an error
    pub none_on_404: bool,
    /// Keep the body as text instead of parsing JSON
    pub raw: bool,
}

impl ResponsePolicy {
    pub fn json(raise_for_status: bool) -> Self {
        Self {
            raise_for_status,
            none_on_404: false,
            raw: false,
        }
    }

    pub fn none_on_404(mut self) -> Self {
        self.none_on_404 = true;
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Raw(String),
}

impl Payload {
    /// JSON view of the payload; raw text is parsed on demand
    pub fn into_json(self, url: &str) -> Result<Value> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Raw(body) => parse_json(url, &body),
        }
    }

    /// Text view of the payload
    pub fn into_text(self) -> String {
        match self {
            Payload::Json(value) => value.to_string(),
            Payload::Raw(body) => body,
        }
    }
}

fn parse_json(url: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| BiothingsError::UnexpectedResponse {
        url: url.to_string(),
        message: format!("invalid JSON body: {}", e),
    })
}

/// Apply the policy to one response
pub fn interpret(url: &str, response: HttpResponse, policy: ResponsePolicy) -> Result<Option<Payload>> {
    if response.status == 404 && policy.none_on_404 {
        return Ok(None);
    }

    if !response.is_success() {
        if policy.raise_for_status {
            return Err(BiothingsError::Status {
                status: response.status,
                url: url.to_string(),
                message: response.body,
            });
        }
        tracing::debug!("HTTP {} from {} passed through", response.status, url);
        if policy.raw {
            return Ok(Some(Payload::Raw(response.body)));
        }
        let value = serde_json::from_str(&response.body)
            .unwrap_or(Value::String(response.body));
        return Ok(Some(Payload::Json(value)));
    }

    if policy.raw {
        Ok(Some(Payload::Raw(response.body)))
    } else {
        Ok(Some(Payload::Json(parse_json(url, &response.body)?)))
    }
}
