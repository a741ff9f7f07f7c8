//! Per-kind node configuration schemas.
//!
//! Defaults mirror the values the default chat workflow ships with;
//! validation keeps numeric options inside their declared ranges.

use serde::{Deserialize, Serialize};

/// Configuration for a query-intake node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryIntakeConfig {
    /// The question text emitted on the `text` port.
    #[serde(default)]
    pub text: String,
}

impl QueryIntakeConfig {
    /// Creates a config emitting the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Configuration for a knowledge-retrieval node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of top-ranked chunks to return.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Minimum similarity score for a chunk to be included.
    #[serde(default)]
    pub similarity_threshold: f32,
    /// Collection to query, if the provider hosts more than one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            similarity_threshold: 0.0,
            collection: None,
        }
    }
}

impl RetrievalConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.top_k < 1 || self.top_k > 50 {
            return Err(format!("top_k must be between 1 and 50, got {}", self.top_k));
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(format!(
                "similarity_threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            ));
        }
        Ok(())
    }
}

/// Configuration for a generation node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Model identifier passed to the completion provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens in the generated response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl GenerationConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.model.is_empty() {
            return Err("model must not be empty".into());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be at least 1".into());
        }
        Ok(())
    }
}

/// Configuration for a web-search node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Number of result snippets to return.
    #[serde(default = "default_results_count")]
    pub results_count: usize,
    /// Region hint for the search provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Language hint for the search provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Whether safe-search filtering is enabled.
    #[serde(default = "default_safe_search")]
    pub safe_search: bool,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            results_count: default_results_count(),
            region: None,
            language: None,
            safe_search: default_safe_search(),
        }
    }
}

impl WebSearchConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.results_count < 1 || self.results_count > 20 {
            return Err(format!(
                "results_count must be between 1 and 20, got {}",
                self.results_count
            ));
        }
        Ok(())
    }
}

/// Configuration for an output node.
///
/// Output nodes have no options; the struct exists so every kind carries a
/// config and serializes uniformly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputConfig {}

impl OutputConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

fn default_top_k() -> usize {
    5
}

fn default_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_results_count() -> usize {
    5
}

fn default_safe_search() -> bool {
    true
}
