//! HTTP boundary for the Scriba generation gateway.
//!
//! Exposes the wire contract consumed by presentation clients: a single
//! `POST /generate` endpoint plus a health check, stateless per request.

pub mod api;

use axum::Router;
use axum::routing::{get, post};
use scriba_core::generation::GenerationGateway;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state: the generation gateway only.
///
/// The gateway holds no per-session state, so one instance serves all
/// concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn GenerationGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self { gateway }
    }
}

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(api::generate::generate))
        .route("/", get(api::health::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
