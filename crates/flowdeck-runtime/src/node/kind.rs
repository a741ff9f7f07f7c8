//! The closed node kind set.

use serde::{Deserialize, Serialize};

use super::config::{
    GenerationConfig, OutputConfig, QueryIntakeConfig, RetrievalConfig, WebSearchConfig,
};
use crate::error::GraphError;

/// Kind of a workflow node, carrying its configuration.
///
/// The kind set is closed: execution dispatches over this enum with an
/// exhaustive match, one handler per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    /// Entry point emitting the configured question text.
    QueryIntake(QueryIntakeConfig),
    /// Retrieves ranked context chunks from the knowledge base.
    KnowledgeRetrieval(RetrievalConfig),
    /// Generates an answer from the query and optional context.
    Generation(GenerationConfig),
    /// Searches the web for result snippets.
    WebSearch(WebSearchConfig),
    /// Terminal node recording the run's final result.
    Output(OutputConfig),
}

impl NodeKind {
    /// Returns the name of this kind.
    pub const fn name(&self) -> NodeKindName {
        match self {
            Self::QueryIntake(_) => NodeKindName::QueryIntake,
            Self::KnowledgeRetrieval(_) => NodeKindName::KnowledgeRetrieval,
            Self::Generation(_) => NodeKindName::Generation,
            Self::WebSearch(_) => NodeKindName::WebSearch,
            Self::Output(_) => NodeKindName::Output,
        }
    }

    /// Returns whether this is a query-intake node.
    pub const fn is_query_intake(&self) -> bool {
        matches!(self, Self::QueryIntake(_))
    }

    /// Returns whether this is an output node.
    pub const fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }

    /// Validates the configuration against the kind's schema.
    pub fn validate_config(&self) -> Result<(), GraphError> {
        let result = match self {
            Self::QueryIntake(config) => config.validate(),
            Self::KnowledgeRetrieval(config) => config.validate(),
            Self::Generation(config) => config.validate(),
            Self::WebSearch(config) => config.validate(),
            Self::Output(config) => config.validate(),
        };
        result.map_err(|message| GraphError::InvalidConfig {
            kind: self.name(),
            message,
        })
    }
}

/// Name of a node kind, without its configuration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Debug, strum::Display, strum::EnumString, strum::EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NodeKindName {
    /// `query-intake`
    QueryIntake,
    /// `knowledge-retrieval`
    KnowledgeRetrieval,
    /// `generation`
    Generation,
    /// `web-search`
    WebSearch,
    /// `output`
    Output,
}

impl NodeKindName {
    /// Parses a kind name, failing with [`GraphError::UnknownKind`] for
    /// anything outside the closed set.
    pub fn parse(kind: &str) -> Result<Self, GraphError> {
        kind.parse().map_err(|_| GraphError::UnknownKind {
            kind: kind.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_kind_name_round_trip() {
        for name in NodeKindName::iter() {
            assert_eq!(NodeKindName::parse(&name.to_string()).unwrap(), name);
        }
    }

    #[test]
    fn test_kind_name_strings() {
        assert_eq!(NodeKindName::QueryIntake.to_string(), "query-intake");
        assert_eq!(NodeKindName::KnowledgeRetrieval.to_string(), "knowledge-retrieval");
        assert_eq!(NodeKindName::WebSearch.to_string(), "web-search");
    }

    #[test]
    fn test_unknown_kind() {
        let err = NodeKindName::parse("llm-engine").unwrap_err();
        assert!(matches!(err, GraphError::UnknownKind { kind } if kind == "llm-engine"));
    }

    #[test]
    fn test_kind_serde_tag() {
        let kind = NodeKind::Generation(GenerationConfig::default());
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "generation");
        assert_eq!(json["model"], "gpt-4o-mini");

        let back: NodeKind = serde_json::from_value(json).unwrap();
        assert_eq!(back, kind);
    }
}
