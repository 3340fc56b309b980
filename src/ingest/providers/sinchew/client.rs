// src/ingest/providers/sinchew/client.rs
//! Endpoint client for the hot-list AJAX endpoint and the WordPress posts API.
//! Failures never leave this module: they become empty outcomes.

use anyhow::{Context, Result};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::raw::{HotListResponse, RawAltItem, RawHotItem};
use crate::ingest::config::{HotListConfig, RuntimeKind, TimeRange};
use crate::ingest::transport::{CacheHints, OutboundRequest, Transport};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
const HOT_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";

const HOT_PATH: &str = "/hot-post-list/";
const HOT_REFERER_PATH: &str = "/hot-posts/";
const ALT_PATH: &str = "/wp-json/wp/v2/posts";
const ALT_PAGE_SIZE: u32 = 10;
const ALT_FIELDS: &str = "id,link,title,excerpt,date";

pub const PRIMARY_CACHE_TTL: Duration = Duration::from_secs(180);
pub const ALTERNATE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Tagged result of one hot-list call. `ok` iff `items` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryOutcome {
    pub items: Vec<RawHotItem>,
    pub ok: bool,
}

impl PrimaryOutcome {
    fn from_items(items: Vec<RawHotItem>) -> Self {
        let ok = !items.is_empty();
        Self { items, ok }
    }
}

pub struct EndpointClient {
    base: Url,
    runtime: RuntimeKind,
    cache_bust: bool,
    transport: Arc<dyn Transport>,
}

impl EndpointClient {
    pub fn new(base: Url, runtime: RuntimeKind, transport: Arc<dyn Transport>) -> Self {
        Self {
            base,
            runtime,
            cache_bust: true,
            transport,
        }
    }

    pub fn from_config(cfg: &HotListConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self::new(cfg.base()?, cfg.runtime, transport).with_cache_bust(cfg.cache_bust))
    }

    pub fn with_cache_bust(mut self, on: bool) -> Self {
        self.cache_bust = on;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn cache_hints(&self, ttl: Duration) -> Option<CacheHints> {
        self.runtime.is_edge().then_some(CacheHints {
            ttl,
            cache_everything: true,
        })
    }

    /// Request for one hot-list page. `now_ms` feeds the cache-busting `_`
    /// parameter when enabled.
    pub fn primary_request(&self, page: u32, range: TimeRange, now_ms: i64) -> OutboundRequest {
        let mut url = self.base.clone();
        url.set_path(HOT_PATH);
        {
            let mut q = url.query_pairs_mut();
            q.clear()
                .append_pair("taxid", "-1")
                .append_pair("page", &page.to_string())
                .append_pair("range", range.code())
                .append_pair("umcl", "Y");
            if self.cache_bust {
                q.append_pair("_", &now_ms.to_string());
            }
        }

        let mut referer = self.base.clone();
        referer.set_path(HOT_REFERER_PATH);

        OutboundRequest {
            url,
            headers: vec![
                ("User-Agent", USER_AGENT.to_string()),
                ("Accept", HOT_ACCEPT.to_string()),
                ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
                ("X-Requested-With", "XMLHttpRequest".to_string()),
                ("Referer", referer.to_string()),
            ],
            cache: self.cache_hints(PRIMARY_CACHE_TTL),
        }
    }

    pub fn alternate_request(&self) -> OutboundRequest {
        let mut url = self.base.clone();
        url.set_path(ALT_PATH);
        url.query_pairs_mut()
            .clear()
            .append_pair("per_page", &ALT_PAGE_SIZE.to_string())
            .append_pair("_fields", ALT_FIELDS);

        let mut referer = self.base.clone();
        referer.set_path("/");

        OutboundRequest {
            url,
            headers: vec![
                ("User-Agent", USER_AGENT.to_string()),
                ("Accept", "application/json".to_string()),
                ("Referer", referer.to_string()),
            ],
            cache: self.cache_hints(ALTERNATE_CACHE_TTL),
        }
    }

    /// Fetch one hot-list page. Never fails; see `PrimaryOutcome`.
    pub async fn fetch_primary(&self, page: u32, range: TimeRange) -> PrimaryOutcome {
        let req = self.primary_request(page, range, chrono::Utc::now().timestamp_millis());
        counter!("hotlist_requests_total", "endpoint" => "primary").increment(1);

        match self.try_fetch_primary(&req).await {
            Ok(items) => {
                tracing::debug!(page, range = range.code(), count = items.len(), "hot list fetched");
                PrimaryOutcome::from_items(items)
            }
            Err(e) => {
                tracing::warn!(error = ?e, page, range = range.code(), "hot list fetch failed");
                counter!("hotlist_request_errors_total", "endpoint" => "primary").increment(1);
                PrimaryOutcome::default()
            }
        }
    }

    async fn try_fetch_primary(&self, req: &OutboundRequest) -> Result<Vec<RawHotItem>> {
        let body = self.transport.get(req).await?;
        parse_hot_list(&body)
    }

    /// Fetch recent posts from the generic content API. Empty on any failure.
    pub async fn fetch_alternate(&self) -> Vec<RawAltItem> {
        let req = self.alternate_request();
        counter!("hotlist_requests_total", "endpoint" => "alternate").increment(1);

        match self.try_fetch_alternate(&req).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "alternate posts fetched");
                items
            }
            Err(e) => {
                tracing::warn!(error = ?e, "alternate posts fetch failed");
                counter!("hotlist_request_errors_total", "endpoint" => "alternate").increment(1);
                Vec::new()
            }
        }
    }

    async fn try_fetch_alternate(&self, req: &OutboundRequest) -> Result<Vec<RawAltItem>> {
        let body = self.transport.get(req).await?;
        parse_alt_posts(&body)
    }
}

/// Decode a body that is either a JSON document or a JSON string holding one.
pub fn decode_body(body: &str) -> Result<serde_json::Value> {
    let v: serde_json::Value = serde_json::from_str(body.trim()).context("response is not json")?;
    match v {
        serde_json::Value::String(inner) => {
            serde_json::from_str(&inner).context("string response does not hold json")
        }
        other => Ok(other),
    }
}

/// Items of a hot-list body. Entries that don't fit `RawHotItem` are skipped.
pub fn parse_hot_list(body: &str) -> Result<Vec<RawHotItem>> {
    let resp: HotListResponse =
        serde_json::from_value(decode_body(body)?).context("unexpected hot list shape")?;
    let raw = resp.result.unwrap_or_default();

    let mut out = Vec::with_capacity(raw.len());
    for v in raw {
        match serde_json::from_value::<RawHotItem>(v) {
            Ok(it) => out.push(it),
            Err(e) => tracing::debug!(error = %e, "skipping malformed hot item"),
        }
    }
    Ok(out)
}

/// Items of a `wp/v2/posts` body. Entries without a numeric id are skipped.
pub fn parse_alt_posts(body: &str) -> Result<Vec<RawAltItem>> {
    let raw: Vec<serde_json::Value> =
        serde_json::from_value(decode_body(body)?).context("posts response is not an array")?;

    let mut out = Vec::with_capacity(raw.len());
    for v in raw {
        match serde_json::from_value::<RawAltItem>(v) {
            Ok(it) => out.push(it),
            Err(e) => tracing::debug!(error = %e, "skipping malformed post"),
        }
    }
    Ok(out)
}
