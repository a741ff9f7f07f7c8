//! Workflow graph runtime representation and resolution.
//!
//! This module provides:
//! - [`WorkflowGraph`]: petgraph-backed graph enforcing structural invariants
//! - [`resolve`]: deterministic topological execution order (Kahn's algorithm)
//! - [`validation_report`]: all resolution errors at once, for UI callers

#[allow(clippy::module_inception)]
mod graph;
mod resolve;

pub use graph::WorkflowGraph;
pub use resolve::{ValidationReport, resolve, validation_report};
