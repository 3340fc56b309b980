// src/ingest/providers/sinchew/mod.rs
//! Sin Chew Daily hot posts.
//!
//! Attempts, in order, stopping at the first that yields items:
//! 1. the configured hot-list page,
//! 2. hot-list page 1 (only when the configured page is not already page 1),
//! 3. the WordPress recent-posts API (edge runtime only).
//!
//! Ranking is preferred over completeness; the ranking-less posts API is only
//! used where upstream blocking is likely.

pub mod client;
pub mod extract;
pub mod normalize;
pub mod raw;

use anyhow::Result;
use async_trait::async_trait;
use metrics::{counter, histogram};
use std::sync::Arc;

use crate::ingest::config::HotListConfig;
use crate::ingest::transport::{ReqwestTransport, Transport};
use crate::ingest::types::{NewsItem, NewsSource};
use client::EndpointClient;
use normalize::{normalize_alt, normalize_hot};

/// Which attempt produced the returned list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Primary,
    SecondaryPage,
    AlternateApi,
    /// Nothing usable came back from any eligible attempt.
    Exhausted,
}

impl FetchStage {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchStage::Primary => "primary",
            FetchStage::SecondaryPage => "secondary_page",
            FetchStage::AlternateApi => "alternate_api",
            FetchStage::Exhausted => "exhausted",
        }
    }
}

pub struct SinchewHotProvider {
    cfg: HotListConfig,
    client: EndpointClient,
}

impl SinchewHotProvider {
    pub fn new(cfg: HotListConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let client = EndpointClient::from_config(&cfg, transport)?;
        Ok(Self { cfg, client })
    }

    /// Provider backed by reqwest with the configured timeout.
    pub fn from_config(cfg: HotListConfig) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(cfg.timeout_secs));
        Self::new(cfg, transport)
    }

    pub fn config(&self) -> &HotListConfig {
        &self.cfg
    }

    /// Run the fallback chain once and report the stage that answered.
    pub async fn fetch_with_stage(&self) -> (FetchStage, Vec<NewsItem>) {
        let t0 = std::time::Instant::now();
        let (stage, items) = self.run_stages().await;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("hotlist_fetch_ms").record(ms);
        counter!("hotlist_items_total", "stage" => stage.as_str()).increment(items.len() as u64);
        tracing::info!(
            target: "ingest",
            stage = stage.as_str(),
            count = items.len(),
            ms,
            "sinchew hot list done"
        );
        (stage, items)
    }

    async fn run_stages(&self) -> (FetchStage, Vec<NewsItem>) {
        let range = self.cfg.range;

        let mut outcome = self.client.fetch_primary(self.cfg.page, range).await;
        let mut stage = FetchStage::Primary;

        if !outcome.ok && self.cfg.page != self.cfg.fallback_page {
            tracing::debug!(
                page = self.cfg.page,
                fallback = self.cfg.fallback_page,
                "configured page empty, retrying fallback page"
            );
            outcome = self.client.fetch_primary(self.cfg.fallback_page, range).await;
            stage = FetchStage::SecondaryPage;
        }

        if !outcome.ok && self.cfg.runtime.is_edge() {
            tracing::debug!("hot list exhausted on edge runtime, trying posts api");
            let alt = normalize_alt(self.client.fetch_alternate().await);
            if !alt.is_empty() {
                return (FetchStage::AlternateApi, alt);
            }
        }

        let items = normalize_hot(outcome.items, self.client.base());
        if items.is_empty() {
            (FetchStage::Exhausted, items)
        } else {
            (stage, items)
        }
    }
}

#[async_trait]
impl NewsSource for SinchewHotProvider {
    async fn fetch_latest(&self) -> Vec<NewsItem> {
        crate::ingest::ensure_metrics_described();
        self.fetch_with_stage().await.1
    }

    fn name(&self) -> &'static str {
        "sinchew"
    }
}
