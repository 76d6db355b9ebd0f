//! ChatApiAgent - chat-completion client for the configured inference
//! provider.
//!
//! Issues a single chat-style completion request per call and returns the
//! trimmed completion text. Credentials are resolved once at construction;
//! the missing-credential check happens before any network call so an
//! unconfigured process fails each call with a `Configuration` error
//! rather than refusing to start.

use reqwest::{Client, StatusCode};
use scriba_core::config::ProviderConfig;
use scriba_core::error::{Result, ScribaError};
use scriba_core::generation::CompletionAgent;
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Completion agent that talks to a chat-completions HTTP endpoint.
#[derive(Clone)]
pub struct ChatApiAgent {
    client: Client,
    config: Result<ProviderConfig>,
    base_url: String,
}

impl ChatApiAgent {
    /// Creates a new agent with an already resolved configuration.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config: Ok(config),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Resolves configuration from `~/.config/scriba/secret.json` and the
    /// environment. Resolution failure is carried inside the agent and
    /// surfaced as a `Configuration` error on each completion call.
    pub fn from_env() -> Self {
        Self {
            client: Client::new(),
            config: ProviderConfig::resolve(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        if let Ok(config) = &mut self.config {
            config.model = model.into();
        }
        self
    }

    /// Overrides the completion endpoint URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a credential and model were resolved at construction.
    pub fn is_configured(&self) -> bool {
        self.config.is_ok()
    }

    /// The configuration failure carried by this agent, if any.
    pub fn config_error(&self) -> Option<&ScribaError> {
        self.config.as_ref().err()
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>, token: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .map_err(|err| ScribaError::provider(format!("completion request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read provider error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ScribaError::provider(format!("failed to parse response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait::async_trait]
impl CompletionAgent for ChatApiAgent {
    async fn complete(&self, system_message: &str, user_message: &str) -> Result<String> {
        let config = self.config.as_ref().map_err(Clone::clone)?;

        if user_message.trim().is_empty() {
            return Err(ScribaError::validation("user message cannot be empty"));
        }

        let request = ChatCompletionRequest {
            model: &config.model,
            provider: &config.provider,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_message,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        tracing::debug!(model = %config.model, "sending completion request");
        self.send_request(&request, &config.api_token).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    provider: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| ScribaError::provider("completion returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: String) -> ScribaError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    ScribaError::provider(format!("completion endpoint returned {status}: {message}"))
}
