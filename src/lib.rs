pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod models;
pub mod routes;
pub mod storage;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::storage::{BlobStore, ObjectStore, StorageResult, SubmissionStore};

/// Connect the configured storage backend and build the router.
pub async fn build_app(config: Config) -> StorageResult<(Router, SharedState)> {
    let objects = storage::connect(&config.storage).await?;
    Ok(build_app_with_store(objects, config))
}

/// Build the router over an already constructed object store.
pub fn build_app_with_store(
    objects: Arc<dyn ObjectStore>,
    config: Config,
) -> (Router, SharedState) {
    if config.admin_key.is_none() {
        tracing::warn!("ADMIN_KEY is not set; admin endpoints will refuse every request");
    }

    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState {
        config,
        blobs: BlobStore::new(objects.clone()),
        submissions: SubmissionStore::new(objects),
    });

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
