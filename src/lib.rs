pub mod config;
pub mod documents;
pub mod ingestion;
pub mod llm;
pub mod models;
pub mod ocr;
pub mod routes;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

#[cfg(test)]
mod tests;

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::ingestion::document_processing::DocumentProcessor;

/// Shared, read-only state handed to every request handler.
pub struct AppState {
    pub config: Config,
    pub processor: DocumentProcessor,
}

/// Build the application router with CORS, tracing and the upload size limit applied.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_file_size_bytes();

    // Wide open for now; ALLOWED_ORIGIN is only reported on /health.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::health::router())
        .nest("/ocr", routes::ocr::router())
        .merge(routes::api_doc::router())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
