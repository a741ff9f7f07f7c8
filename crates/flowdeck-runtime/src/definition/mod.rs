//! Serializable workflow definitions.
//!
//! This module contains JSON-friendly types for defining workflows:
//! - [`WorkflowDefinition`]: nodes, edges, and metadata as stored/edited
//! - [`Node`], [`NodeId`]: a node with editor metadata and its kind
//! - [`Edge`], [`EdgeId`]: a port-level connection between two nodes
//! - [`Position`]: visual-editor placement, ignored by execution
//! - [`WorkflowMetadata`]: name, description, version, timestamps
//!
//! Definitions may be structurally invalid (editors save work in progress);
//! invariants are enforced when a definition is loaded into a
//! [`WorkflowGraph`](crate::graph::WorkflowGraph).

mod edge;
mod id;
mod metadata;
mod node;
mod position;
mod workflow;

pub use edge::Edge;
pub use id::{EdgeId, NodeId};
pub use metadata::WorkflowMetadata;
pub use node::{Node, NodeBuilder};
pub use position::Position;
pub use workflow::WorkflowDefinition;
