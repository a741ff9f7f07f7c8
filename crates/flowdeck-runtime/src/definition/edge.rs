//! Edge types for connecting nodes in a workflow graph.

use serde::{Deserialize, Serialize};

use super::id::{EdgeId, NodeId};

/// A directed, port-level connection between two nodes.
///
/// Values flow from `from_port` on the source node into `to_port` on the
/// target node. At most one edge may feed a given `(to, to_port)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Edge identifier.
    #[serde(default)]
    pub id: EdgeId,
    /// Source node ID.
    pub from: NodeId,
    /// Port name on the source node.
    pub from_port: String,
    /// Target node ID.
    pub to: NodeId,
    /// Port name on the target node.
    pub to_port: String,
}

impl Edge {
    /// Creates a new edge with a generated ID.
    pub fn new(
        from: NodeId,
        from_port: impl Into<String>,
        to: NodeId,
        to_port: impl Into<String>,
    ) -> Self {
        Self {
            id: EdgeId::new(),
            from,
            from_port: from_port.into(),
            to,
            to_port: to_port.into(),
        }
    }
}
