//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// GET /
///
/// Liveness probe for presentation clients and monitoring.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Scriba backend is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
