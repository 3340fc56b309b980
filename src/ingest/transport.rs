// src/ingest/transport.rs
//! Outbound HTTP seam. The endpoint client describes a request; a `Transport`
//! executes it. Production uses reqwest, tests script responses.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Caching directives attached on the edge runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheHints {
    pub ttl: Duration,
    /// Cache every response variant, not only cacheable-by-default ones.
    pub cache_everything: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub cache: Option<CacheHints>,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET the request and return the raw body. Status codes are not
    /// interpreted here; callers decide from the body alone.
    async fn get(&self, req: &OutboundRequest) -> Result<String>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Best-effort rendering of cache hints as a request `Cache-Control` header.
/// Only the TTL has a request directive (`max-age`); `cache_everything` is an
/// edge-runtime hint with no standard request form and is not sent.
pub fn cache_control_value(hints: &CacheHints) -> String {
    format!("max-age={}", hints.ttl.as_secs())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, req: &OutboundRequest) -> Result<String> {
        let mut rb = self
            .client
            .get(req.url.clone())
            .timeout(self.timeout);
        for (k, v) in &req.headers {
            rb = rb.header(*k, v);
        }
        if let Some(hints) = &req.cache {
            rb = rb.header(reqwest::header::CACHE_CONTROL, cache_control_value(hints));
        }

        let resp = rb
            .send()
            .await
            .with_context(|| format!("GET {}", req.url))?;
        tracing::debug!(status = %resp.status(), url = %req.url, "upstream response");
        resp.text().await.context("reading upstream body")
    }
}
