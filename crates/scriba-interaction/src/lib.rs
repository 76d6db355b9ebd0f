//! Outbound API agents for the Scriba pipeline.
//!
//! `ChatApiAgent` implements [`scriba_core::CompletionAgent`] against a
//! chat-completions endpoint; `OpenAlexAgent` implements
//! [`scriba_core::CitationSource`] against the OpenAlex works API.

pub mod chat;
pub mod openalex;

pub use chat::ChatApiAgent;
pub use openalex::OpenAlexAgent;
