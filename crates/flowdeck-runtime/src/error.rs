//! Workflow error types.
//!
//! Errors are layered by the stage that produces them:
//! - [`GraphError`]: structural errors from graph mutations
//! - [`ResolveError`]: resolution errors reported before a run starts
//! - [`RunError`]: execution errors that fail a run in progress
//!
//! [`WorkflowError`] is the top-level type callers match on.

use thiserror::Error;

use crate::definition::{EdgeId, NodeId};

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Graph structure is invalid.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Graph failed resolution; the run never started.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A node failed during execution.
    #[error(transparent)]
    Run(#[from] RunError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Structural errors raised by graph mutations.
///
/// These indicate a malformed graph and are surfaced to the caller
/// immediately, never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Node kind is not in the closed kind set.
    #[error("unknown node kind: {kind}")]
    UnknownKind {
        /// The unrecognized kind string.
        kind: String,
    },

    /// Node configuration violates the kind's schema.
    #[error("invalid config for {kind} node: {message}")]
    InvalidConfig {
        /// Kind of the node with invalid config.
        kind: crate::node::NodeKindName,
        /// What was out of range or missing.
        message: String,
    },

    /// Referenced node does not exist.
    #[error("node {node_id} not found")]
    NodeNotFound {
        /// The missing node ID.
        node_id: NodeId,
    },

    /// Referenced edge does not exist.
    #[error("edge {edge_id} not found")]
    EdgeNotFound {
        /// The missing edge ID.
        edge_id: EdgeId,
    },

    /// Edge connects a node to itself.
    #[error("node {node_id} cannot connect to itself")]
    SelfLoop {
        /// The node on both ends of the edge.
        node_id: NodeId,
    },

    /// Edge uses a port the node's kind does not declare.
    #[error("node {node_id} has no {direction} port named {port}")]
    PortMismatch {
        /// Node whose kind does not declare the port.
        node_id: NodeId,
        /// The undeclared port name.
        port: String,
        /// `"input"` or `"output"`.
        direction: &'static str,
    },

    /// Target port already has an incoming edge (single-writer inputs).
    #[error("input port {port} on node {node_id} already has an incoming edge")]
    DuplicateInput {
        /// Node owning the contested input port.
        node_id: NodeId,
        /// The contested port name.
        port: String,
    },
}

/// Resolution errors reported by the topological resolver.
///
/// All of these are surfaced before any provider call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The graph contains a cycle.
    #[error("cycle detected involving {} node(s)", nodes.len())]
    CycleDetected {
        /// Every node with residual in-degree after Kahn's algorithm
        /// terminated early, in ascending id order.
        nodes: Vec<NodeId>,
    },

    /// A required input port has no incoming edge and no default.
    #[error("input port {port} on node {node_id} is not connected")]
    UnsatisfiedInput {
        /// Node with the unfed port.
        node_id: NodeId,
        /// The unfed required port.
        port: String,
    },

    /// No output node is reachable from a query-intake node.
    #[error("no output node is reachable from a query-intake node")]
    NoOutputPath,
}

/// Execution errors that transition a run to `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// The retrieval provider reported a failure.
    #[error("retrieval failed at node {node_id}: {message}")]
    Retrieval {
        /// The knowledge-retrieval node that failed.
        node_id: NodeId,
        /// Provider-reported reason.
        message: String,
    },

    /// The completion provider reported a failure.
    #[error("generation failed at node {node_id}: {message}")]
    Generation {
        /// The generation node that failed.
        node_id: NodeId,
        /// Provider-reported reason.
        message: String,
    },

    /// The search provider reported a failure.
    #[error("web search failed at node {node_id}: {message}")]
    Search {
        /// The web-search node that failed.
        node_id: NodeId,
        /// Provider-reported reason.
        message: String,
    },

    /// An invariant the resolver guarantees was violated at run time.
    #[error("engine invariant violated at node {node_id}: {message}")]
    Invariant {
        /// Node being evaluated when the invariant broke.
        node_id: NodeId,
        /// Which invariant broke.
        message: String,
    },

    /// The run was cancelled by the caller.
    #[error("run cancelled before node {node_id}")]
    Cancelled {
        /// Node that was about to be evaluated.
        node_id: NodeId,
    },
}

impl RunError {
    /// Returns the node the error is attributed to.
    pub const fn node_id(&self) -> NodeId {
        match self {
            Self::Retrieval { node_id, .. }
            | Self::Generation { node_id, .. }
            | Self::Search { node_id, .. }
            | Self::Invariant { node_id, .. }
            | Self::Cancelled { node_id } => *node_id,
        }
    }

    /// Returns the bare failure reason, without the node attribution that
    /// the `Display` impl adds (the trace already keys errors by node).
    pub fn message(&self) -> &str {
        match self {
            Self::Retrieval { message, .. }
            | Self::Generation { message, .. }
            | Self::Search { message, .. }
            | Self::Invariant { message, .. } => message,
            Self::Cancelled { .. } => "run cancelled",
        }
    }
}
