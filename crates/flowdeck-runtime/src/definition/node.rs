//! Node definition types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use super::position::Position;
use crate::node::NodeKind;

/// A workflow node definition with editor metadata and kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(
    name = "NodeBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with")
)]
pub struct Node {
    /// Display name of the node.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub name: Option<String>,
    /// Description of what this node does.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub description: Option<String>,
    /// Position in the visual editor (ignored by execution).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub position: Option<Position>,
    /// The node kind with its configuration.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Creates a new node with the given kind.
    pub fn new(kind: impl Into<NodeKind>) -> Self {
        Self {
            name: None,
            description: None,
            position: None,
            kind: kind.into(),
        }
    }

    /// Returns a builder for creating a node.
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the editor position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns whether this is a query-intake node.
    pub const fn is_query_intake(&self) -> bool {
        self.kind.is_query_intake()
    }

    /// Returns whether this is an output node.
    pub const fn is_output(&self) -> bool {
        self.kind.is_output()
    }
}
