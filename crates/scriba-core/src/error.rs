//! Error types for the Scriba pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Scriba pipeline.
///
/// The first four variants map one-to-one onto the pipeline's failure
/// taxonomy:
///
/// - [`Validation`](ScribaError::Validation): missing or empty required
///   input. The caller's fault, always recoverable, reported back verbatim.
/// - [`Configuration`](ScribaError::Configuration): missing credential or
///   model identity. Fatal for the affected call, checked before any
///   network traffic.
/// - [`Provider`](ScribaError::Provider): the completion endpoint failed
///   or returned content in an unexpected shape. Recoverable per call.
/// - [`Network`](ScribaError::Network): transport failure on a
///   best-effort lookup. Swallowed by the citation enrichment layer and
///   never surfaced as a pipeline failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScribaError {
    /// Missing or empty required input. Displayed verbatim so callers can
    /// relay the message unchanged.
    #[error("{0}")]
    Validation(String),

    /// Missing credential or model identifier.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Completion provider failure or malformed completion content.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Transport-level failure on an enrichment lookup.
    #[error("Network error: {0}")]
    Network(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScribaError {
    /// Creates a Validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a Provider error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Creates a Network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a Configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is a Provider error
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<reqwest::Error> for ScribaError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ScribaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Provider(format!("malformed JSON payload: {err}"))
    }
}

/// A type alias for `Result<T, ScribaError>`.
pub type Result<T> = std::result::Result<T, ScribaError>;
