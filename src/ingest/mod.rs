// src/ingest/mod.rs
pub mod config;
pub mod providers;
pub mod transport;
pub mod types;

use crate::ingest::types::{NewsItem, NewsSource};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "hotlist_requests_total",
            "Upstream requests issued, labelled by endpoint."
        );
        describe_counter!(
            "hotlist_request_errors_total",
            "Upstream transport/parse failures converted to empty results."
        );
        describe_counter!("hotlist_items_total", "Canonical items emitted.");
        describe_counter!(
            "hotlist_discarded_total",
            "Raw items dropped for a missing title or url."
        );
        describe_histogram!("hotlist_fetch_ms", "Full fallback pipeline time in milliseconds.");
        describe_counter!("ingest_runs_total", "Ingest runs across all sources.");
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix ts when ingest pipeline last ran."
        );
    });
}

/// Clean a markup-bearing fragment into plain text.
///
/// Strips tags, then decodes entities (so escaped `&lt;` text survives),
/// collapses whitespace runs (NBSP included) and trims. An empty result is
/// reported as `None`.
pub fn clean_text(s: &str) -> Option<String> {
    // 1) Strip tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?s)<.*?>").unwrap());
    let stripped = re_tags.replace_all(s, "");

    // 2) HTML entity decode
    let mut out = html_escape::decode_html_entities(&stripped).to_string();

    // 3) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();

    let out = out.trim();
    if out.is_empty() {
        None
    } else {
        Some(out.to_string())
    }
}

/// Run every registered source once, sequentially, in registration order.
/// A source that produces nothing contributes an empty list.
pub async fn run_once(sources: &[Box<dyn NewsSource>]) -> Vec<(&'static str, Vec<NewsItem>)> {
    ensure_metrics_described();

    let mut out = Vec::with_capacity(sources.len());
    for s in sources {
        let items = s.fetch_latest().await;
        if items.is_empty() {
            tracing::warn!(source = s.name(), "source returned no items");
        } else {
            tracing::info!(source = s.name(), count = items.len(), "source fetched");
        }
        out.push((s.name(), items));
    }

    let now = chrono::Utc::now().timestamp().max(0);
    counter!("ingest_runs_total").increment(1);
    gauge!("ingest_pipeline_last_run_ts").set(now as f64);

    out
}
