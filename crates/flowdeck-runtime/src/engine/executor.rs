//! Workflow execution engine.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use super::context::{ExecutionContext, PortValue};
use super::{EngineConfig, prompt};
use crate::definition::{Node, NodeId};
use crate::error::{RunError, WorkflowError, WorkflowResult};
use crate::graph::{ValidationReport, WorkflowGraph, resolve, validation_report};
use crate::node::{
    GenerationConfig, NodeKind, RetrievalConfig, WebSearchConfig, port, ports,
};
use crate::provider::{CompletionRequest, Providers, RetrievalRequest, SearchRequest};

/// Tracing target for engine operations.
const TRACING_TARGET: &str = "flowdeck_runtime::engine";

/// State of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    /// Run has been created but not started.
    Pending,
    /// Run is evaluating nodes.
    Running,
    /// Every node evaluated; outputs are complete.
    Completed,
    /// A node failed or the run was cancelled; evaluation halted.
    Failed,
}

/// Outcome of a workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Final run state (`Completed` or `Failed`).
    pub status: RunStatus,
    /// Final value recorded per output node.
    pub outputs: HashMap<NodeId, String>,
    /// Full execution trace: every node's outputs plus the error list.
    pub trace: ExecutionContext,
}

impl RunResult {
    /// Returns whether the run completed successfully.
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// The workflow execution engine.
///
/// Evaluates a resolved graph in a single synchronous pass: nodes run in
/// topological order, each reading its inputs from upstream outputs and
/// delegating provider work to the configured capabilities. The first node
/// failure halts the run; downstream nodes are never dispatched.
pub struct Engine {
    config: EngineConfig,
    providers: Providers,
    semaphore: Arc<Semaphore>,
}

impl Engine {
    /// Creates a new engine with the given providers and configuration.
    pub fn new(providers: Providers, config: EngineConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_runs));

        tracing::info!(
            target: TRACING_TARGET,
            max_concurrent_runs = config.max_concurrent_runs,
            "Workflow engine initialized"
        );

        Self {
            config,
            providers,
            semaphore,
        }
    }

    /// Creates a new engine with default configuration.
    pub fn with_defaults(providers: Providers) -> Self {
        Self::new(providers, EngineConfig::default())
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates a graph without running it, collecting every resolution
    /// error so a caller can highlight all offending nodes at once.
    pub fn validate(&self, graph: &WorkflowGraph) -> ValidationReport {
        validation_report(graph)
    }

    /// Executes a workflow graph.
    ///
    /// Resolution errors return `Err` before any provider is contacted.
    /// Node failures return `Ok` with [`RunStatus::Failed`] and the partial
    /// trace.
    pub async fn run(&self, graph: &WorkflowGraph) -> WorkflowResult<RunResult> {
        self.run_with_cancellation(graph, CancellationToken::new())
            .await
    }

    /// Executes a workflow graph with caller-controlled cancellation.
    ///
    /// Cancellation is checked before each node evaluation, never mid
    /// provider call; a cancelled run fails with a cancellation error in
    /// its trace.
    pub async fn run_with_cancellation(
        &self,
        graph: &WorkflowGraph,
        cancellation: CancellationToken,
    ) -> WorkflowResult<RunResult> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| WorkflowError::Internal(format!("semaphore closed: {e}")))?;

        let order = resolve(graph)?;

        tracing::debug!(
            target: TRACING_TARGET,
            node_count = order.len(),
            "Starting workflow run"
        );

        let mut ctx = ExecutionContext::new();
        let mut outputs = HashMap::new();

        for node_id in order {
            if cancellation.is_cancelled() {
                let error = RunError::Cancelled { node_id };
                return Ok(Self::failed(ctx, outputs, error));
            }

            let result = self.evaluate(graph, node_id, &ctx).await;
            match result {
                Ok(NodeOutcome::Outputs(values)) => {
                    tracing::trace!(
                        target: TRACING_TARGET,
                        node_id = %node_id,
                        port_count = values.len(),
                        "Node evaluated"
                    );
                    ctx.record_outputs(node_id, values);
                }
                Ok(NodeOutcome::FinalValue(value)) => {
                    tracing::trace!(
                        target: TRACING_TARGET,
                        node_id = %node_id,
                        "Output node recorded final value"
                    );
                    ctx.record_outputs(node_id, HashMap::new());
                    outputs.insert(node_id, value);
                }
                Err(error) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        node_id = %node_id,
                        error = %error,
                        "Node failed, halting run"
                    );
                    return Ok(Self::failed(ctx, outputs, error));
                }
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            output_count = outputs.len(),
            "Workflow run completed"
        );

        Ok(RunResult {
            status: RunStatus::Completed,
            outputs,
            trace: ctx,
        })
    }

    fn failed(
        mut ctx: ExecutionContext,
        outputs: HashMap<NodeId, String>,
        error: RunError,
    ) -> RunResult {
        ctx.record_error(error.node_id(), error.message());
        RunResult {
            status: RunStatus::Failed,
            outputs,
            trace: ctx,
        }
    }

    /// Evaluates a single node: gathers its inputs from upstream outputs
    /// and dispatches on its kind.
    async fn evaluate(
        &self,
        graph: &WorkflowGraph,
        node_id: NodeId,
        ctx: &ExecutionContext,
    ) -> Result<NodeOutcome, RunError> {
        let node = graph.get_node(node_id).ok_or_else(|| RunError::Invariant {
            node_id,
            message: "resolved order references a node missing from the graph".into(),
        })?;

        let mut inputs = self.gather_inputs(graph, node_id, node, ctx)?;

        match &node.kind {
            NodeKind::QueryIntake(config) => Ok(NodeOutcome::outputs([(
                port::TEXT,
                PortValue::Text(config.text.clone()),
            )])),
            NodeKind::KnowledgeRetrieval(config) => {
                let query = take_text(&mut inputs, node_id, port::QUERY)?;
                let chunks = self.retrieve(node_id, config, query).await?;
                Ok(NodeOutcome::outputs([(
                    port::CHUNKS,
                    PortValue::TextList(chunks),
                )]))
            }
            NodeKind::Generation(config) => {
                let query = take_text(&mut inputs, node_id, port::QUERY)?;
                // Optional port: absent context means the model is asked to
                // answer from general knowledge.
                let context = inputs
                    .remove(port::CONTEXT)
                    .map(PortValue::into_text_list)
                    .unwrap_or_default();
                let response = self.generate(node_id, config, query, context).await?;
                Ok(NodeOutcome::outputs([(
                    port::RESPONSE,
                    PortValue::Text(response),
                )]))
            }
            NodeKind::WebSearch(config) => {
                let query = take_text(&mut inputs, node_id, port::QUERY)?;
                let results = self.search(node_id, config, query).await?;
                Ok(NodeOutcome::outputs([(
                    port::RESULTS,
                    PortValue::TextList(results),
                )]))
            }
            NodeKind::Output(_) => {
                let value = take_text(&mut inputs, node_id, port::VALUE)?;
                Ok(NodeOutcome::FinalValue(value))
            }
        }
    }

    /// Reads the value feeding each declared input port.
    ///
    /// The resolver guarantees every required port has an incoming edge and
    /// every upstream node runs first; a miss here is an engine invariant
    /// violation, never a silent skip.
    fn gather_inputs(
        &self,
        graph: &WorkflowGraph,
        node_id: NodeId,
        node: &Node,
        ctx: &ExecutionContext,
    ) -> Result<HashMap<&'static str, PortValue>, RunError> {
        let incoming = graph.incoming_edges(node_id);
        let mut values = HashMap::new();

        for input in ports(node.kind.name()).inputs {
            let edge = incoming.iter().find(|edge| edge.to_port == input.name);
            match edge {
                Some(edge) => {
                    let value = ctx.output(edge.from, &edge.from_port).cloned().ok_or_else(
                        || RunError::Invariant {
                            node_id,
                            message: format!(
                                "input {} read before upstream node {} produced {}",
                                input.name, edge.from, edge.from_port
                            ),
                        },
                    )?;
                    values.insert(input.name, value);
                }
                None if input.required => {
                    return Err(RunError::Invariant {
                        node_id,
                        message: format!("required input {} has no incoming edge", input.name),
                    });
                }
                // Optional ports fall back to their kind default at dispatch.
                None => {}
            }
        }

        Ok(values)
    }

    async fn retrieve(
        &self,
        node_id: NodeId,
        config: &RetrievalConfig,
        query: String,
    ) -> Result<Vec<String>, RunError> {
        let request = RetrievalRequest {
            query,
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
            collection: config.collection.clone(),
        };
        // An empty chunk list is a valid outcome: generation falls back to
        // general knowledge.
        self.providers
            .retrieval
            .retrieve(request)
            .await
            .map_err(|e| RunError::Retrieval {
                node_id,
                message: e.message,
            })
    }

    async fn generate(
        &self,
        node_id: NodeId,
        config: &GenerationConfig,
        query: String,
        context: Vec<String>,
    ) -> Result<String, RunError> {
        let request = CompletionRequest {
            prompt: prompt::build_prompt(&query, &context),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };
        self.providers
            .completion
            .complete(request)
            .await
            .map_err(|e| RunError::Generation {
                node_id,
                message: e.message,
            })
    }

    async fn search(
        &self,
        node_id: NodeId,
        config: &WebSearchConfig,
        query: String,
    ) -> Result<Vec<String>, RunError> {
        let request = SearchRequest {
            query,
            results_count: config.results_count,
            region: config.region.clone(),
            language: config.language.clone(),
            safe_search: config.safe_search,
        };
        self.providers
            .search
            .search(request)
            .await
            .map_err(|e| RunError::Search {
                node_id,
                message: e.message,
            })
    }

    /// Returns the number of available run slots.
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("available_slots", &self.available_slots())
            .finish()
    }
}

/// Result of evaluating one node.
enum NodeOutcome {
    /// Outputs recorded for downstream consumption.
    Outputs(HashMap<String, PortValue>),
    /// An output node's final value.
    FinalValue(String),
}

impl NodeOutcome {
    fn outputs<const N: usize>(entries: [(&str, PortValue); N]) -> Self {
        Self::Outputs(
            entries
                .into_iter()
                .map(|(port, value)| (port.to_owned(), value))
                .collect(),
        )
    }
}

fn take_text(
    inputs: &mut HashMap<&'static str, PortValue>,
    node_id: NodeId,
    port: &'static str,
) -> Result<String, RunError> {
    inputs
        .remove(port)
        .map(PortValue::into_text)
        .ok_or_else(|| RunError::Invariant {
            node_id,
            message: format!("required input {port} was not gathered"),
        })
}
