//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Response for GET /health.
#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// Handle GET /health.
pub(crate) async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "mdr",
    })
}
