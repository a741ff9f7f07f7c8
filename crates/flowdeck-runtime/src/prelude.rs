//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types for ergonomic imports:
//!
//! ```rust
//! use flowdeck_runtime::prelude::*;
//! ```

pub use crate::definition::{Edge, EdgeId, Node, NodeId, WorkflowDefinition, WorkflowMetadata};
pub use crate::engine::{Engine, EngineConfig, RunResult, RunStatus};
pub use crate::error::{WorkflowError, WorkflowResult};
pub use crate::graph::{WorkflowGraph, resolve};
pub use crate::node::{
    GenerationConfig, NodeKind, NodeKindName, OutputConfig, QueryIntakeConfig, RetrievalConfig,
    WebSearchConfig,
};
pub use crate::provider::{
    CompletionProvider, Providers, RetrievalProvider, SearchProvider,
};
