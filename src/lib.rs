// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod ingest;
pub mod metrics;

pub use crate::api::router;
pub use crate::ingest::config::{HotListConfig, RuntimeKind, TimeRange};
pub use crate::ingest::providers::sinchew::SinchewHotProvider;
pub use crate::ingest::types::{ExtraInfo, NewsExtra, NewsId, NewsItem, NewsSource};

/// Every source this service registers, keyed by `NewsSource::name`.
pub fn default_sources(cfg: HotListConfig) -> anyhow::Result<Vec<Box<dyn NewsSource>>> {
    let sources: Vec<Box<dyn NewsSource>> = vec![Box::new(SinchewHotProvider::from_config(cfg)?)];
    Ok(sources)
}
