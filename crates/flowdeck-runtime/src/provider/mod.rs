//! External capability contracts the engine delegates to.
//!
//! The engine never talks to a vector store, LLM, or search API directly;
//! it calls these traits:
//! - [`RetrievalProvider`]: ranked context chunks for a query
//! - [`CompletionProvider`]: generated text for a prompt
//! - [`SearchProvider`]: web result snippets for a query
//!
//! Retry, backoff, and timeouts are the provider's concern; a failure is
//! reported once via [`ProviderError`] and the engine propagates it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by an external capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider-reported reason.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Parameters for a retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    /// Query text to match against the knowledge base.
    pub query: String,
    /// Number of top-ranked chunks to return.
    pub top_k: usize,
    /// Minimum similarity score for inclusion.
    pub similarity_threshold: f32,
    /// Collection to query, if the provider hosts more than one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// Parameters for a completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Full prompt text.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
}

/// Parameters for a web search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text.
    pub query: String,
    /// Number of result snippets to return.
    pub results_count: usize,
    /// Region hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Language hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Whether safe-search filtering is enabled.
    pub safe_search: bool,
}

/// Retrieves ranked context chunks from a knowledge base.
#[async_trait::async_trait]
pub trait RetrievalProvider: Send + Sync {
    /// Returns the chunks matching the query, best first. An empty result
    /// is valid: it means nothing relevant was found, not a failure.
    async fn retrieve(&self, request: RetrievalRequest) -> ProviderResult<Vec<String>>;
}

/// Generates text from a prompt.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the generated text for the prompt.
    async fn complete(&self, request: CompletionRequest) -> ProviderResult<String>;
}

/// Searches the web for result snippets.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns result snippets for the query. An empty result is valid.
    async fn search(&self, request: SearchRequest) -> ProviderResult<Vec<String>>;
}

/// The capability bundle an engine is constructed with.
#[derive(Clone)]
pub struct Providers {
    /// Knowledge-base retrieval capability.
    pub retrieval: Arc<dyn RetrievalProvider>,
    /// Text generation capability.
    pub completion: Arc<dyn CompletionProvider>,
    /// Web search capability.
    pub search: Arc<dyn SearchProvider>,
}

impl Providers {
    /// Creates a provider bundle.
    pub fn new(
        retrieval: Arc<dyn RetrievalProvider>,
        completion: Arc<dyn CompletionProvider>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            retrieval,
            completion,
            search,
        }
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}
