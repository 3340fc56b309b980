//! Hot-posts service — Binary Entrypoint
//! Boots the Axum HTTP server with the registered news sources and `/metrics`.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sinchew_hot::api::{self, AppState};
use sinchew_hot::ingest::config::load_config_default;
use sinchew_hot::metrics::Metrics;

/// Compact tracing logs, enabled only when HOTLIST_DEV_LOG=1.
/// The hosting runtime may already own the global subscriber; that is fine.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("HOTLIST_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if !dev_flag {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sinchew_hot=info,ingest=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    enable_dev_tracing();

    // Runtime kind is resolved here once and travels inside the config.
    let cfg = load_config_default()?;
    tracing::info!(
        page = cfg.page,
        range = cfg.range.code(),
        runtime = ?cfg.runtime,
        "hot-list config loaded"
    );

    let state = AppState::new(sinchew_hot::default_sources(cfg)?);
    let mut router = api::router(state);

    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = ?e, "metrics recorder not installed"),
    }

    Ok(router.into())
}
