use std::collections::BTreeMap;
use std::sync::Arc;

use shuttle_axum::axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::ingest::{self, types::NewsSource};

#[derive(Clone)]
pub struct AppState {
    sources: Arc<Vec<Box<dyn NewsSource>>>,
}

impl AppState {
    pub fn new(sources: Vec<Box<dyn NewsSource>>) -> Self {
        Self {
            sources: Arc::new(sources),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(all_news))
        .route("/news/{source}", get(source_news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Runs every source once; a failing source shows up as an empty list.
async fn all_news(State(st): State<AppState>) -> Response {
    let runs = ingest::run_once(&st.sources).await;
    let body: BTreeMap<&str, _> = runs.into_iter().collect();
    Json(body).into_response()
}

async fn source_news(State(st): State<AppState>, Path(source): Path<String>) -> Response {
    let Some(src) = st.sources.iter().find(|s| s.name() == source) else {
        return (StatusCode::NOT_FOUND, format!("unknown source: {source}")).into_response();
    };
    Json(src.fetch_latest().await).into_response()
}
