//! Route definitions and router construction.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use super::handlers;
use super::state::AppState;

/// Build the application router with all routes and middleware.
///
/// `/api/v1/translate` and `/api/v2/translate` are kept as aliases of the
/// buffered and streaming endpoints.
pub fn create_router(state: AppState) -> Router {
    let max_body_bytes = state.server.max_body_bytes;

    Router::new()
        .route("/translate", post(handlers::translate))
        .route("/api/v1/translate", post(handlers::translate))
        .route("/translate/stream", post(handlers::translate_stream))
        .route("/api/v2/translate", post(handlers::translate_stream))
        .route("/healthz", get(handlers::healthz))
        .route("/downloads/:name", get(handlers::download))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
