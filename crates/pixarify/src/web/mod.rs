//! Browser surface: a single upload form backed by the pipeline.
//!
//! Every request is its own interaction. Nothing is kept between requests,
//! so "Try Again" is a plain link back to the empty form.

mod handlers;
mod page;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use pixarify_core::config::LimitsConfig;
use pixarify_core::Pipeline;

/// Headroom on top of the image limit for multipart framing.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
}

/// Build the application router.
pub fn router(pipeline: Pipeline, limits: &LimitsConfig) -> Router {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };
    let body_limit = usize::try_from(limits.max_upload_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(handlers::index))
        .route("/pixarify", post(handlers::pixarify))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
