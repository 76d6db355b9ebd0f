//! Generation gateway service.
//!
//! The stateless boundary between prompt assembly and the completion
//! backend. One best-effort attempt per call; adapter failures propagate
//! unchanged.

use scriba_core::error::{Result, ScribaError};
use scriba_core::generation::{
    CompletionAgent, GenerationGateway, GenerationRequest, GenerationResponse,
};
use std::sync::Arc;

/// Fixed system instruction sent with every completion request.
pub const SYSTEM_PROMPT: &str = "You are a helpful academic writing assistant. \
    Provide clear, concise, and well-structured responses.";

/// [`GenerationGateway`] implementation over a [`CompletionAgent`].
///
/// Holds no per-session state; a single instance is shared by all
/// concurrent sessions.
#[derive(Clone)]
pub struct GenerationService {
    agent: Arc<dyn CompletionAgent>,
}

impl GenerationService {
    pub fn new(agent: Arc<dyn CompletionAgent>) -> Self {
        Self { agent }
    }
}

#[async_trait::async_trait]
impl GenerationGateway for GenerationService {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        if request.prompt.trim().is_empty() {
            return Err(ScribaError::validation("prompt and type are required"));
        }

        tracing::info!(stage = %request.stage, "processing generation request");
        let text = self.agent.complete(SYSTEM_PROMPT, &request.prompt).await?;

        Ok(GenerationResponse {
            stage: request.stage,
            text,
        })
    }
}
