//! Outbound HTTP for tools
//!
//! Tools talk to the network only through [`HttpTransport`], which keeps
//! request construction testable without a live endpoint.

use crate::config::RequestType;
use crate::error::{Result, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Duration;

/// A fully constructed outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: RequestType,
    /// Base endpoint, used verbatim
    pub url: String,
    /// Query parameters appended to `url`
    pub query: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<Value>,
}

impl OutboundRequest {
    pub fn new(method: RequestType, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The endpoint with query parameters appended
    pub fn full_url(&self) -> std::result::Result<url::Url, TransportError> {
        let mut url = url::Url::parse(&self.url).map_err(|e| TransportError::InvalidRequest {
            message: format!("invalid URL '{}': {}", self.url, e),
        })?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

/// A received HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, content_type: Option<&str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the content type declares JSON (`application/json`, `+json`)
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let essence = ct.split(';').next().unwrap_or_default().trim();
                essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

/// Sends outbound requests; one call is one request, never retried
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

/// Production transport backed by a shared `reqwest::Client`
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport whose every request carries `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dialtone/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn map_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else if error.is_connect() {
            TransportError::Connect {
                message: error.to_string(),
            }
        } else if error.is_builder() {
            TransportError::InvalidRequest {
                message: error.to_string(),
            }
        } else {
            TransportError::Other {
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let url = request.full_url()?;
        let mut builder = self
            .client
            .request(request.method.into(), url)
            .timeout(self.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Shorten text for log output
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
