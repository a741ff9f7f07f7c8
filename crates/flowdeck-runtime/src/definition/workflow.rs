//! Serializable workflow definition.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::edge::Edge;
use super::id::{EdgeId, NodeId};
use super::metadata::WorkflowMetadata;
use super::node::Node;
use super::position::Position;
use crate::node::{
    GenerationConfig, OutputConfig, QueryIntakeConfig, RetrievalConfig, port,
};

/// Serializable workflow definition.
///
/// The JSON-friendly representation of a workflow graph, as stored and
/// edited. Definitions are not validated on mutation — editors may save
/// incomplete or even cyclic graphs; loading into a
/// [`WorkflowGraph`](crate::graph::WorkflowGraph) enforces the structural
/// invariants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Nodes in the workflow, keyed by their ID.
    pub nodes: HashMap<NodeId, Node>,
    /// Edges connecting nodes.
    pub edges: Vec<Edge>,
    /// Workflow metadata.
    #[serde(default)]
    pub metadata: WorkflowMetadata,
}

impl WorkflowDefinition {
    /// Creates a new empty workflow definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workflow definition with metadata.
    pub fn with_metadata(metadata: WorkflowMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Adds a node to the workflow.
    pub fn add_node(&mut self, id: NodeId, node: Node) -> &mut Self {
        self.nodes.insert(id, node);
        self
    }

    /// Adds an edge to the workflow.
    pub fn add_edge(&mut self, edge: Edge) -> &mut Self {
        self.edges.push(edge);
        self
    }

    /// Connects two nodes, generating the edge ID.
    pub fn connect(
        &mut self,
        from: NodeId,
        from_port: impl Into<String>,
        to: NodeId,
        to_port: impl Into<String>,
    ) -> EdgeId {
        let edge = Edge::new(from, from_port, to, to_port);
        let id = edge.id;
        self.edges.push(edge);
        id
    }

    /// Returns an iterator over query-intake nodes.
    pub fn query_intake_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter().filter(|(_, node)| node.is_query_intake())
    }

    /// Returns an iterator over output nodes.
    pub fn output_nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter().filter(|(_, node)| node.is_output())
    }

    /// The default chat workflow seeded for a new workspace:
    /// query-intake feeding knowledge-retrieval and generation, retrieval
    /// chunks grounding generation, and the response wired to an output.
    pub fn chat_template() -> Self {
        let mut def = Self::with_metadata(
            WorkflowMetadata::named("Chat with knowledge base")
                .with_description("Answers questions grounded in the workspace's documents"),
        );

        let query = NodeId::new();
        let retrieval = NodeId::new();
        let generation = NodeId::new();
        let output = NodeId::new();

        def.add_node(
            query,
            Node::new(QueryIntakeConfig::default())
                .with_name("User Query")
                .with_description("Entry point for user questions")
                .with_position(Position::new(100.0, 200.0)),
        );
        def.add_node(
            retrieval,
            Node::new(RetrievalConfig::default())
                .with_name("Knowledge Base")
                .with_description("Document knowledge retrieval")
                .with_position(Position::new(350.0, 200.0)),
        );
        def.add_node(
            generation,
            Node::new(GenerationConfig::default())
                .with_name("LLM Engine")
                .with_description("AI reasoning and response generation")
                .with_position(Position::new(600.0, 200.0)),
        );
        def.add_node(
            output,
            Node::new(OutputConfig::default())
                .with_name("Chat Output")
                .with_description("Final response to user")
                .with_position(Position::new(850.0, 200.0)),
        );

        def.connect(query, port::TEXT, retrieval, port::QUERY);
        def.connect(query, port::TEXT, generation, port::QUERY);
        def.connect(retrieval, port::CHUNKS, generation, port::CONTEXT);
        def.connect(generation, port::RESPONSE, output, port::VALUE);

        def
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::node::WebSearchConfig;

    fn test_node_id(n: u128) -> NodeId {
        NodeId::from_uuid(Uuid::from_u128(n))
    }

    #[test]
    fn test_workflow_definition_new() {
        let def = WorkflowDefinition::new();
        assert!(def.nodes.is_empty());
        assert!(def.edges.is_empty());
    }

    #[test]
    fn test_workflow_definition_connect() {
        let mut def = WorkflowDefinition::new();
        let id1 = test_node_id(1);
        let id2 = test_node_id(2);
        def.add_node(id1, Node::new(QueryIntakeConfig::default()));
        def.add_node(id2, Node::new(OutputConfig::default()));
        def.connect(id1, port::TEXT, id2, port::VALUE);

        assert_eq!(def.edges.len(), 1);
        assert_eq!(def.edges[0].from, id1);
        assert_eq!(def.edges[0].to, id2);
        assert_eq!(def.edges[0].to_port, port::VALUE);
    }

    #[test]
    fn test_workflow_definition_node_iterators() {
        let mut def = WorkflowDefinition::new();
        def.add_node(test_node_id(1), Node::new(QueryIntakeConfig::default()));
        def.add_node(test_node_id(2), Node::new(WebSearchConfig::default()));
        def.add_node(test_node_id(3), Node::new(OutputConfig::default()));

        assert_eq!(def.query_intake_nodes().count(), 1);
        assert_eq!(def.output_nodes().count(), 1);
    }

    #[test]
    fn test_chat_template_shape() {
        let def = WorkflowDefinition::chat_template();
        assert_eq!(def.nodes.len(), 4);
        assert_eq!(def.edges.len(), 4);
        assert_eq!(def.query_intake_nodes().count(), 1);
        assert_eq!(def.output_nodes().count(), 1);

        assert_eq!(def.metadata.name.as_deref(), Some("Chat with knowledge base"));
        assert!(def.metadata.version.is_some());
        assert!(def.metadata.created_at.is_some());

        // Layout is present but execution-irrelevant.
        assert!(def.nodes.values().all(|n| n.position.is_some()));
    }

    #[test]
    fn test_workflow_definition_serialization() {
        let def = WorkflowDefinition::chat_template();

        let json = serde_json::to_string(&def).expect("serialization failed");
        let deserialized: WorkflowDefinition =
            serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(def, deserialized);
    }
}
