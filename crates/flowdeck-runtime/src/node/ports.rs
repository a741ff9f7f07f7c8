//! Fixed port contracts per node kind.

use super::kind::NodeKindName;
use super::port;

/// A declared input port on a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPort {
    /// Port name.
    pub name: &'static str,
    /// Whether the resolver requires an incoming edge on this port.
    ///
    /// Optional ports fall back to a kind-defined default at execution
    /// time (generation's `context` becomes an empty chunk list).
    pub required: bool,
}

impl InputPort {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Declared input and output ports of a node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePorts {
    /// Input ports consumed by the kind.
    pub inputs: &'static [InputPort],
    /// Output ports produced by the kind.
    pub outputs: &'static [&'static str],
}

impl NodePorts {
    /// Looks up a declared input port by name.
    pub fn input(&self, name: &str) -> Option<&InputPort> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Returns whether the kind declares the given output port.
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains(&name)
    }
}

const QUERY_INTAKE_PORTS: NodePorts = NodePorts {
    inputs: &[],
    outputs: &[port::TEXT],
};

const KNOWLEDGE_RETRIEVAL_PORTS: NodePorts = NodePorts {
    inputs: &[InputPort::required(port::QUERY)],
    outputs: &[port::CHUNKS],
};

const GENERATION_PORTS: NodePorts = NodePorts {
    inputs: &[
        InputPort::required(port::QUERY),
        InputPort::optional(port::CONTEXT),
    ],
    outputs: &[port::RESPONSE],
};

const WEB_SEARCH_PORTS: NodePorts = NodePorts {
    inputs: &[InputPort::required(port::QUERY)],
    outputs: &[port::RESULTS],
};

const OUTPUT_PORTS: NodePorts = NodePorts {
    inputs: &[InputPort::required(port::VALUE)],
    outputs: &[],
};

/// Returns the port contract for a node kind.
///
/// Pure lookup; the contract is fixed per kind.
pub const fn ports(kind: NodeKindName) -> &'static NodePorts {
    match kind {
        NodeKindName::QueryIntake => &QUERY_INTAKE_PORTS,
        NodeKindName::KnowledgeRetrieval => &KNOWLEDGE_RETRIEVAL_PORTS,
        NodeKindName::Generation => &GENERATION_PORTS,
        NodeKindName::WebSearch => &WEB_SEARCH_PORTS,
        NodeKindName::Output => &OUTPUT_PORTS,
    }
}
