//! Per-run execution context.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::definition::NodeId;

/// A value flowing along an edge.
///
/// Ports carry either a single text value or a list of text chunks. The
/// coercion helpers let a list feed a text port (joined) and vice versa
/// (singleton list), since edges are matched by port name, not value shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// A single text value.
    Text(String),
    /// A list of text chunks.
    TextList(Vec<String>),
}

impl PortValue {
    /// Returns the value as a single text.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::TextList(list) => list.join("\n"),
        }
    }

    /// Returns the value as a list of text chunks.
    pub fn into_text_list(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::TextList(list) => list,
        }
    }
}

impl From<String> for PortValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for PortValue {
    fn from(list: Vec<String>) -> Self {
        Self::TextList(list)
    }
}

/// An error recorded against a node during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeError {
    /// Node the error is attributed to.
    pub node_id: NodeId,
    /// Failure reason.
    pub message: String,
}

/// Execution context for a single workflow run.
///
/// Holds every node's recorded outputs for downstream consumption and the
/// ordered error trace. Owned exclusively by one run; concurrent runs never
/// share a context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Outputs recorded per node, keyed by output port name.
    pub node_outputs: HashMap<NodeId, HashMap<String, PortValue>>,
    /// Errors in the order they occurred.
    pub errors: Vec<NodeError>,
}

impl ExecutionContext {
    /// Creates a new empty execution context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a node's outputs.
    pub fn record_outputs(&mut self, node_id: NodeId, outputs: HashMap<String, PortValue>) {
        self.node_outputs.insert(node_id, outputs);
    }

    /// Records an error against a node.
    pub fn record_error(&mut self, node_id: NodeId, message: impl Into<String>) {
        self.errors.push(NodeError {
            node_id,
            message: message.into(),
        });
    }

    /// Looks up the value a node produced on a port.
    pub fn output(&self, node_id: NodeId, port: &str) -> Option<&PortValue> {
        self.node_outputs.get(&node_id)?.get(port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_value_coercion() {
        let text = PortValue::Text("a".into());
        assert_eq!(text.clone().into_text(), "a");
        assert_eq!(text.into_text_list(), vec!["a".to_owned()]);

        let list = PortValue::TextList(vec!["a".into(), "b".into()]);
        assert_eq!(list.clone().into_text(), "a\nb");
        assert_eq!(list.into_text_list().len(), 2);
    }

    #[test]
    fn test_port_value_serde_untagged() {
        let text: PortValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, PortValue::Text("hello".into()));

        let list: PortValue = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(list, PortValue::TextList(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_context_output_lookup() {
        let mut ctx = ExecutionContext::new();
        let id = NodeId::new();
        ctx.record_outputs(id, HashMap::from([("text".to_owned(), "q".to_owned().into())]));

        assert_eq!(ctx.output(id, "text"), Some(&PortValue::Text("q".into())));
        assert!(ctx.output(id, "chunks").is_none());
        assert!(ctx.errors.is_empty());
    }
}
