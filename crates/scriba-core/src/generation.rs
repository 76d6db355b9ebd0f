//! Generation request/response types and the service traits the pipeline
//! is wired through.
//!
//! The traits live here rather than in the crates that implement them so
//! that the application layer can depend on abstractions without a
//! circular dependency on the interaction layer.

use crate::citation::Citation;
use crate::error::Result;
use crate::stage::StageType;
use serde::{Deserialize, Serialize};

/// A single generation call: one prompt, one target artifact.
///
/// Transient: constructed per call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub stage: StageType,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, stage: StageType) -> Self {
        Self {
            prompt: prompt.into(),
            stage,
        }
    }
}

/// The generated text, keyed by the stage that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub stage: StageType,
    pub text: String,
}

/// A chat-completion backend.
///
/// Implementations wrap one inference provider. They must verify their own
/// credentials before any network call (`Configuration` error when absent)
/// and surface provider failures unchanged.
#[async_trait::async_trait]
pub trait CompletionAgent: Send + Sync {
    /// Issues a single chat-style completion and returns the trimmed text.
    ///
    /// # Errors
    ///
    /// - `Configuration` when credential or model identity is unresolved
    /// - `Validation` when `user_message` is empty
    /// - `Provider` when the response lacks usable completion content
    async fn complete(&self, system_message: &str, user_message: &str) -> Result<String>;
}

/// The stateless boundary translating a stage request into a provider
/// completion call.
///
/// One best-effort attempt per call; no retry, no backoff. Safe to share
/// across concurrent sessions; implementations hold no per-session state.
#[async_trait::async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Runs one generation call for the given request.
    ///
    /// # Errors
    ///
    /// - `Validation` when the prompt is empty
    /// - `Configuration` / `Provider` propagated unchanged from the backend
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse>;
}

/// A best-effort scholarly citation lookup.
///
/// Enrichment, not a dependency: implementations degrade to an empty list
/// on any failure and never return an error to the caller.
#[async_trait::async_trait]
pub trait CitationSource: Send + Sync {
    /// Returns up to `limit` citations for `topic`, ordered by provider
    /// relevance. Empty on failure or empty topic.
    async fn fetch_citations(&self, topic: &str, limit: usize) -> Vec<Citation>;
}
