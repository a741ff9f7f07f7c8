//! Workflow graph runtime representation.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::definition::{Edge, EdgeId, Node, NodeId, WorkflowDefinition, WorkflowMetadata};
use crate::error::GraphError;
use crate::node::{NodeKind, ports};

/// Edge payload stored in the underlying petgraph.
#[derive(Debug, Clone)]
struct EdgeWeight {
    id: EdgeId,
    from_port: String,
    to_port: String,
}

/// A workflow graph containing nodes and port-level edges.
///
/// Uses petgraph's `StableDiGraph` so node removal keeps the id-to-index
/// maps valid. Every mutation enforces the structural invariants: validated
/// configs, declared ports on both edge endpoints, no self-loops, and at
/// most one incoming edge per `(node, input port)` pair. Acyclicity is not
/// enforced here — it is checked at resolve time, so editors can hold
/// work-in-progress graphs.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    /// The underlying directed graph.
    graph: StableDiGraph<Node, EdgeWeight>,
    /// Mapping from NodeId to petgraph's NodeIndex.
    node_indices: HashMap<NodeId, NodeIndex>,
    /// Reverse mapping from NodeIndex to NodeId.
    index_to_id: HashMap<NodeIndex, NodeId>,
    /// Mapping from EdgeId to petgraph's EdgeIndex.
    edge_indices: HashMap<EdgeId, EdgeIndex>,
    /// Workflow metadata.
    pub metadata: WorkflowMetadata,
}

impl WorkflowGraph {
    /// Creates a new empty workflow graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new workflow graph with metadata.
    pub fn with_metadata(metadata: WorkflowMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Adds a node to the graph and returns its generated ID.
    ///
    /// Fails with [`GraphError::InvalidConfig`] if the node's configuration
    /// violates its kind's schema.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = NodeId::new();
        self.add_node_with_id(id, node)?;
        Ok(id)
    }

    /// Adds a node with a specific ID (used when loading definitions).
    pub fn add_node_with_id(&mut self, id: NodeId, node: Node) -> Result<(), GraphError> {
        node.kind.validate_config()?;
        let index = self.graph.add_node(node);
        self.node_indices.insert(id, index);
        self.index_to_id.insert(index, id);
        Ok(())
    }

    /// Removes a node and every edge touching it.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if the node does not exist.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let index = self
            .node_indices
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound { node_id: id })?;

        // Cascade: drop id map entries for every touching edge before the
        // graph removes them.
        let touching: Vec<EdgeId> = self
            .graph
            .edges_directed(index, Direction::Incoming)
            .chain(self.graph.edges_directed(index, Direction::Outgoing))
            .map(|edge_ref| edge_ref.weight().id)
            .collect();
        for edge_id in touching {
            self.edge_indices.remove(&edge_id);
        }

        self.node_indices.remove(&id);
        self.index_to_id.remove(&index);
        self.graph
            .remove_node(index)
            .ok_or(GraphError::NodeNotFound { node_id: id })
    }

    /// Replaces a node's configuration, re-validating it.
    ///
    /// The kind itself cannot change: edges are validated against the kind's
    /// port contract, so swapping kinds would invalidate them silently.
    pub fn update_node_config(&mut self, id: NodeId, kind: NodeKind) -> Result<(), GraphError> {
        let current = self.node_mut(id)?;
        if current.kind.name() != kind.name() {
            return Err(GraphError::InvalidConfig {
                kind: kind.name(),
                message: format!("cannot change node kind from {}", current.kind.name()),
            });
        }
        kind.validate_config()?;
        current.kind = kind;
        Ok(())
    }

    /// Returns a reference to a node.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        let index = self.node_indices.get(&id)?;
        self.graph.node_weight(*index)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        let index = self
            .node_indices
            .get(&id)
            .copied()
            .ok_or(GraphError::NodeNotFound { node_id: id })?;
        self.graph
            .node_weight_mut(index)
            .ok_or(GraphError::NodeNotFound { node_id: id })
    }

    /// Returns whether a node exists.
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_indices.contains_key(&id)
    }

    /// Returns an iterator over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.graph.node_indices().filter_map(|index| {
            let id = self.index_to_id.get(&index)?;
            let node = self.graph.node_weight(index)?;
            Some((*id, node))
        })
    }

    /// Returns an iterator over all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_indices.keys().copied()
    }

    /// Adds an edge between two node ports.
    ///
    /// Fails with [`GraphError::NodeNotFound`] if either endpoint is absent,
    /// [`GraphError::SelfLoop`] if both endpoints are the same node,
    /// [`GraphError::PortMismatch`] if a port is not declared by the
    /// endpoint's kind, or [`GraphError::DuplicateInput`] if the target port
    /// already has an incoming edge.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId, GraphError> {
        let from_index = self
            .node_indices
            .get(&edge.from)
            .copied()
            .ok_or(GraphError::NodeNotFound { node_id: edge.from })?;
        let to_index = self
            .node_indices
            .get(&edge.to)
            .copied()
            .ok_or(GraphError::NodeNotFound { node_id: edge.to })?;

        if edge.from == edge.to {
            return Err(GraphError::SelfLoop { node_id: edge.from });
        }

        let from_kind = self.kind_name_at(from_index, edge.from)?;
        if !ports(from_kind).has_output(&edge.from_port) {
            return Err(GraphError::PortMismatch {
                node_id: edge.from,
                port: edge.from_port,
                direction: "output",
            });
        }

        let to_kind = self.kind_name_at(to_index, edge.to)?;
        if ports(to_kind).input(&edge.to_port).is_none() {
            return Err(GraphError::PortMismatch {
                node_id: edge.to,
                port: edge.to_port,
                direction: "input",
            });
        }

        // Single-writer inputs: one edge per (target, port) pair.
        let occupied = self
            .graph
            .edges_directed(to_index, Direction::Incoming)
            .any(|edge_ref| edge_ref.weight().to_port == edge.to_port);
        if occupied {
            return Err(GraphError::DuplicateInput {
                node_id: edge.to,
                port: edge.to_port,
            });
        }

        let weight = EdgeWeight {
            id: edge.id,
            from_port: edge.from_port,
            to_port: edge.to_port,
        };
        let index = self.graph.add_edge(from_index, to_index, weight);
        self.edge_indices.insert(edge.id, index);
        Ok(edge.id)
    }

    /// Connects two node ports, generating the edge ID.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_port: impl Into<String>,
        to: NodeId,
        to_port: impl Into<String>,
    ) -> Result<EdgeId, GraphError> {
        self.add_edge(Edge::new(from, from_port, to, to_port))
    }

    /// Removes an edge.
    ///
    /// Fails with [`GraphError::EdgeNotFound`] if the edge does not exist.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge, GraphError> {
        let index = self
            .edge_indices
            .remove(&id)
            .ok_or(GraphError::EdgeNotFound { edge_id: id })?;

        let (from_index, to_index) = self
            .graph
            .edge_endpoints(index)
            .ok_or(GraphError::EdgeNotFound { edge_id: id })?;
        let from = self.id_at(from_index, id)?;
        let to = self.id_at(to_index, id)?;

        let weight = self
            .graph
            .remove_edge(index)
            .ok_or(GraphError::EdgeNotFound { edge_id: id })?;

        Ok(Edge {
            id: weight.id,
            from,
            from_port: weight.from_port,
            to,
            to_port: weight.to_port,
        })
    }

    /// Returns an iterator over all edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.graph.edge_references().filter_map(|edge_ref| {
            let from = *self.index_to_id.get(&edge_ref.source())?;
            let to = *self.index_to_id.get(&edge_ref.target())?;
            let weight = edge_ref.weight();
            Some(Edge {
                id: weight.id,
                from,
                from_port: weight.from_port.clone(),
                to,
                to_port: weight.to_port.clone(),
            })
        })
    }

    /// Returns edges originating from a node.
    pub fn outgoing_edges(&self, id: NodeId) -> Vec<Edge> {
        self.directed_edges(id, Direction::Outgoing)
    }

    /// Returns edges targeting a node.
    pub fn incoming_edges(&self, id: NodeId) -> Vec<Edge> {
        self.directed_edges(id, Direction::Incoming)
    }

    fn directed_edges(&self, id: NodeId, direction: Direction) -> Vec<Edge> {
        let Some(&index) = self.node_indices.get(&id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(index, direction)
            .filter_map(|edge_ref| {
                let from = *self.index_to_id.get(&edge_ref.source())?;
                let to = *self.index_to_id.get(&edge_ref.target())?;
                let weight = edge_ref.weight();
                Some(Edge {
                    id: weight.id,
                    from,
                    from_port: weight.from_port.clone(),
                    to,
                    to_port: weight.to_port.clone(),
                })
            })
            .collect()
    }

    /// Returns all query-intake node IDs, ascending.
    pub fn query_intake_ids(&self) -> Vec<NodeId> {
        self.ids_where(|node| node.is_query_intake())
    }

    /// Returns all output node IDs, ascending.
    pub fn output_ids(&self) -> Vec<NodeId> {
        self.ids_where(|node| node.is_output())
    }

    fn ids_where(&self, predicate: impl Fn(&Node) -> bool) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes()
            .filter(|(_, node)| predicate(node))
            .map(|(id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Converts the workflow graph to a serializable definition.
    pub fn to_definition(&self) -> WorkflowDefinition {
        WorkflowDefinition {
            nodes: self.nodes().map(|(id, node)| (id, node.clone())).collect(),
            edges: self.edges().collect(),
            metadata: self.metadata.clone(),
        }
    }

    /// Builds a workflow graph from a definition, enforcing all structural
    /// invariants. The first violation in a saved-invalid definition is
    /// reported.
    pub fn from_definition(definition: WorkflowDefinition) -> Result<Self, GraphError> {
        let mut graph = Self::with_metadata(definition.metadata);

        for (id, node) in definition.nodes {
            graph.add_node_with_id(id, node)?;
        }
        for edge in definition.edges {
            graph.add_edge(edge)?;
        }

        Ok(graph)
    }

    fn kind_name_at(
        &self,
        index: NodeIndex,
        id: NodeId,
    ) -> Result<crate::node::NodeKindName, GraphError> {
        self.graph
            .node_weight(index)
            .map(|node| node.kind.name())
            .ok_or(GraphError::NodeNotFound { node_id: id })
    }

    fn id_at(&self, index: NodeIndex, edge_id: EdgeId) -> Result<NodeId, GraphError> {
        self.index_to_id
            .get(&index)
            .copied()
            .ok_or(GraphError::EdgeNotFound { edge_id })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::node::{
        GenerationConfig, OutputConfig, QueryIntakeConfig, RetrievalConfig, port,
    };

    fn test_node_id(n: u128) -> NodeId {
        NodeId::from_uuid(Uuid::from_u128(n))
    }

    fn graph_with(nodes: &[(u128, NodeKind)]) -> WorkflowGraph {
        let mut graph = WorkflowGraph::new();
        for (n, kind) in nodes {
            graph
                .add_node_with_id(test_node_id(*n), Node::new(kind.clone()))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_add_node_validates_config() {
        let mut graph = WorkflowGraph::new();
        let bad = RetrievalConfig {
            top_k: 0,
            ..Default::default()
        };
        let err = graph.add_node(Node::new(bad)).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig { .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_remove_node_cascades_edges() {
        let mut graph = graph_with(&[
            (1, QueryIntakeConfig::default().into()),
            (2, RetrievalConfig::default().into()),
            (3, GenerationConfig::default().into()),
        ]);
        graph
            .connect(test_node_id(1), port::TEXT, test_node_id(2), port::QUERY)
            .unwrap();
        let edge_id = graph
            .connect(test_node_id(2), port::CHUNKS, test_node_id(3), port::CONTEXT)
            .unwrap();

        graph.remove_node(test_node_id(2)).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(matches!(
            graph.remove_edge(edge_id),
            Err(GraphError::EdgeNotFound { .. })
        ));

        // Remaining nodes are still addressable after the removal.
        assert!(graph.contains_node(test_node_id(1)));
        assert!(graph.contains_node(test_node_id(3)));
    }

    #[test]
    fn test_remove_missing_node() {
        let mut graph = WorkflowGraph::new();
        assert!(matches!(
            graph.remove_node(test_node_id(9)),
            Err(GraphError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut graph = graph_with(&[(1, GenerationConfig::default().into())]);
        let err = graph
            .connect(test_node_id(1), port::RESPONSE, test_node_id(1), port::QUERY)
            .unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop { .. }));
    }

    #[test]
    fn test_port_mismatch_rejected() {
        let mut graph = graph_with(&[
            (1, QueryIntakeConfig::default().into()),
            (2, RetrievalConfig::default().into()),
        ]);

        // query-intake does not produce `chunks`.
        let err = graph
            .connect(test_node_id(1), port::CHUNKS, test_node_id(2), port::QUERY)
            .unwrap_err();
        assert!(
            matches!(err, GraphError::PortMismatch { direction: "output", .. }),
            "got {err:?}"
        );

        // retrieval does not consume `context`.
        let err = graph
            .connect(test_node_id(1), port::TEXT, test_node_id(2), port::CONTEXT)
            .unwrap_err();
        assert!(
            matches!(err, GraphError::PortMismatch { direction: "input", .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn test_duplicate_input_rejected() {
        let mut graph = graph_with(&[
            (1, QueryIntakeConfig::default().into()),
            (2, QueryIntakeConfig::default().into()),
            (3, RetrievalConfig::default().into()),
        ]);
        graph
            .connect(test_node_id(1), port::TEXT, test_node_id(3), port::QUERY)
            .unwrap();
        let err = graph
            .connect(test_node_id(2), port::TEXT, test_node_id(3), port::QUERY)
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateInput { .. }));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edge_to_missing_node() {
        let mut graph = graph_with(&[(1, QueryIntakeConfig::default().into())]);
        let err = graph
            .connect(test_node_id(1), port::TEXT, test_node_id(9), port::QUERY)
            .unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound { .. }));
    }

    #[test]
    fn test_update_node_config() {
        let mut graph = graph_with(&[(1, GenerationConfig::default().into())]);

        let updated = GenerationConfig {
            temperature: 0.2,
            ..Default::default()
        };
        graph
            .update_node_config(test_node_id(1), updated.clone().into())
            .unwrap();
        let node = graph.get_node(test_node_id(1)).unwrap();
        assert_eq!(node.kind, NodeKind::Generation(updated));

        // Kind changes are rejected.
        let err = graph
            .update_node_config(test_node_id(1), OutputConfig::default().into())
            .unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig { .. }));
    }

    #[test]
    fn test_definition_round_trip() {
        let def = WorkflowDefinition::chat_template();
        let graph = WorkflowGraph::from_definition(def.clone()).unwrap();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);

        let back = graph.to_definition();
        assert_eq!(back.nodes.len(), def.nodes.len());
        assert_eq!(back.edges.len(), def.edges.len());
    }
}
