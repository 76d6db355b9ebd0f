//! scriba-server - HTTP gateway for the Scriba generation pipeline.
//!
//! Serves `POST /generate` backed by the configured chat-completion
//! provider. Missing provider configuration is reported loudly at startup
//! and fails the affected calls, not the process.

use anyhow::Result;
use scriba_application::GenerationService;
use scriba_interaction::ChatApiAgent;
use scriba_server::{AppState, build_router};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Scriba backend v{}", env!("CARGO_PKG_VERSION"));

    let agent = ChatApiAgent::from_env();
    match agent.config_error() {
        Some(err) => error!("{err}; generation requests will fail until configured"),
        None => info!("provider configuration resolved"),
    }

    let gateway = Arc::new(GenerationService::new(Arc::new(agent)));
    let app = build_router(AppState::new(gateway));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("scriba-server listening on http://127.0.0.1:{port}");

    axum::serve(listener, app).await?;

    Ok(())
}
