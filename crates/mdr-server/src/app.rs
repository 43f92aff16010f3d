//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::get_health))
        .route("/render", post(handlers::render::render_unified))
        .route("/render/html", post(handlers::render::render_html))
        .route("/render/pdf", post(handlers::render::render_pdf))
        .route("/render/docx", post(handlers::render::render_docx))
        .route("/render/xlsx", post(handlers::render::render_xlsx))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::content_type_options_layer()),
        )
        .with_state(state)
}
