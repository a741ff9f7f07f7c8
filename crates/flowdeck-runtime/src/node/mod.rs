//! Node kinds, port contracts, and configuration schemas.
//!
//! This module is the single source of truth for what each node kind
//! consumes and produces:
//! - [`NodeKind`]: the closed set of node kinds with their configuration
//! - [`NodeKindName`]: string form of a kind (`query-intake`, `output`, ...)
//! - [`NodePorts`]: declared input/output ports per kind, via [`ports`]
//! - Per-kind config structs with serde defaults and range validation

mod config;
mod kind;
mod ports;

pub use config::{
    GenerationConfig, OutputConfig, QueryIntakeConfig, RetrievalConfig, WebSearchConfig,
};
pub use kind::{NodeKind, NodeKindName};
pub use ports::{InputPort, NodePorts, ports};

/// Port names used by the fixed kind contracts.
pub mod port {
    /// Output of query-intake: the user's question text.
    pub const TEXT: &str = "text";
    /// Input of retrieval, generation, and web-search: the query text.
    pub const QUERY: &str = "query";
    /// Output of knowledge-retrieval: ranked context chunks.
    pub const CHUNKS: &str = "chunks";
    /// Optional input of generation: context chunks to ground the answer.
    pub const CONTEXT: &str = "context";
    /// Output of generation: the generated answer text.
    pub const RESPONSE: &str = "response";
    /// Output of web-search: result snippets.
    pub const RESULTS: &str = "results";
    /// Input of output: the value recorded as the run's final result.
    pub const VALUE: &str = "value";
}
