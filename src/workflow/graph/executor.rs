//! Graph runner
//!
//! Runs one node at a time from a FIFO queue. A node's outputs travel along
//! every outgoing edge its invocation did not stop, and each target is
//! queued. Cycles are allowed; routers on a cycle bound it with their
//! iteration guard and the runner bounds everything with a step limit.

use crate::component::context::RunContext;
use crate::component::error::{GraphError, SwitchyardError};
use crate::component::{Component, Ports};
use crate::workflow::nodes::{output_key, RUN_INPUT_KEY};
use crate::workflow::types::EdgeDefinition;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Environment variable overriding the default step limit
pub const MAX_STEPS_ENV: &str = "SWITCHYARD_MAX_STEPS";

const DEFAULT_MAX_STEPS: usize = 100;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Node invocations allowed per run
    pub max_steps: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl RunnerConfig {
    /// Read settings from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, SwitchyardError> {
        match std::env::var(MAX_STEPS_ENV) {
            Ok(raw) => Self::parse_max_steps(&raw).map(|max_steps| Self { max_steps }),
            Err(_) => Ok(Self::default()),
        }
    }

    fn parse_max_steps(raw: &str) -> Result<usize, SwitchyardError> {
        match raw.trim().parse::<usize>() {
            Ok(0) | Err(_) => Err(SwitchyardError::config(format!(
                "{} must be a positive integer, got '{}'",
                MAX_STEPS_ENV, raw
            ))),
            Ok(n) => Ok(n),
        }
    }
}

/// Result of one graph run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: String,
    /// Last value received by each `output` node that ran
    pub outputs: BTreeMap<String, Value>,
    /// Final run state
    pub state: Value,
    /// Node ids in invocation order
    pub trace: Vec<String>,
    pub steps: usize,
    /// Whether the step limit ended the run
    pub truncated: bool,
}

/// Executes a compiled graph
pub struct GraphRunner {
    name: String,
    description: String,
    nodes: HashMap<String, Arc<dyn Component>>,
    node_order: Vec<String>,
    edges: Vec<EdgeDefinition>,
    config: RunnerConfig,
}

impl GraphRunner {
    /// Create a runner, rejecting duplicate ids and edges that do not join
    /// a declared output to a known node
    pub fn new(
        name: String,
        description: String,
        nodes: Vec<Arc<dyn Component>>,
        edges: Vec<EdgeDefinition>,
        config: RunnerConfig,
    ) -> Result<Self, GraphError> {
        let mut node_order: Vec<String> = Vec::with_capacity(nodes.len());
        let mut by_id: HashMap<String, Arc<dyn Component>> = HashMap::new();
        for node in nodes {
            let id = node.id().to_string();
            if by_id.contains_key(&id) {
                return Err(GraphError::DuplicateNode(id));
            }
            node_order.push(id.clone());
            by_id.insert(id, node);
        }

        for edge in &edges {
            let from = by_id
                .get(&edge.from)
                .ok_or_else(|| GraphError::UnknownNode(edge.from.clone()))?;
            if !by_id.contains_key(&edge.to) {
                return Err(GraphError::UnknownNode(edge.to.clone()));
            }
            if !from.outputs().iter().any(|o| *o == edge.output) {
                return Err(GraphError::InvalidOutput {
                    node: edge.from.clone(),
                    output: edge.output.clone(),
                });
            }
        }

        Ok(Self {
            name,
            description,
            nodes: by_id,
            node_order,
            edges,
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Nodes without incoming edges, in definition order. Listeners are
    /// excluded: they only run when notified.
    fn entry_nodes(&self) -> Vec<&str> {
        let targets: HashSet<&str> = self.edges.iter().map(|e| e.to.as_str()).collect();
        self.node_order
            .iter()
            .filter(|id| !targets.contains(id.as_str()))
            .filter(|id| self.nodes[*id].listens().is_none())
            .map(|id| id.as_str())
            .collect()
    }

    fn listeners_of(&self, name: &str) -> Vec<&str> {
        self.node_order
            .iter()
            .filter(|id| self.nodes[*id].listens() == Some(name))
            .map(|id| id.as_str())
            .collect()
    }

    /// Send a node's outputs along its live edges
    fn deliver(
        &self,
        node_id: &str,
        outputs: &Ports,
        ctx: &RunContext,
        inbox: &mut HashMap<String, Ports>,
        queue: &mut VecDeque<String>,
    ) {
        for edge in self.edges.iter().filter(|e| e.from == node_id) {
            if ctx.is_stopped(node_id, &edge.output) {
                log::debug!("Edge {}.{} -> {} pruned", node_id, edge.output, edge.to);
                continue;
            }
            let Some(value) = outputs.get(&edge.output) else {
                continue;
            };
            inbox
                .entry(edge.to.clone())
                .or_default()
                .insert(edge.input.clone(), value.clone());
            enqueue(queue, &edge.to);
        }
    }

    /// Run the graph in a fresh run context
    pub async fn run(&self, input: impl Into<String>) -> Result<RunReport, SwitchyardError> {
        self.run_with_context(input, RunContext::new()).await
    }

    /// Run the graph in the given run context
    pub async fn run_with_context(
        &self,
        input: impl Into<String>,
        mut ctx: RunContext,
    ) -> Result<RunReport, SwitchyardError> {
        ctx.state_mut()
            .set(RUN_INPUT_KEY, Value::String(input.into()));
        log::info!("Starting run {} of graph {}", ctx.run_id(), self.name);

        let mut queue: VecDeque<String> = VecDeque::new();
        for id in self.entry_nodes() {
            enqueue(&mut queue, id);
        }

        // Inputs are sticky: a node sees the latest value per input name.
        let mut inbox: HashMap<String, Ports> = HashMap::new();
        let mut trace = Vec::new();
        let mut truncated = false;

        while let Some(node_id) = queue.pop_front() {
            if trace.len() >= self.config.max_steps {
                log::error!(
                    "Graph {} exceeded {} steps, stopping run",
                    self.name,
                    self.config.max_steps
                );
                truncated = true;
                break;
            }

            let node = &self.nodes[&node_id];
            let inputs = inbox.get(&node_id).cloned().unwrap_or_default();
            trace.push(node_id.clone());
            log::info!("Step {}: executing node {}", trace.len(), node_id);

            ctx.begin_invocation(&node_id);
            match node.run(&inputs, &mut ctx).await {
                Ok(outputs) => {
                    self.deliver(&node_id, &outputs, &ctx, &mut inbox, &mut queue);
                    if let Some(name) = node.notifies() {
                        for listener in self.listeners_of(name) {
                            enqueue(&mut queue, listener);
                        }
                    }
                }
                Err(e) => {
                    log::error!("Node {} failed: {}", node_id, e);
                    ctx.state_mut()
                        .set(&format!("{}.error", node_id), Value::String(e.to_string()));
                }
            }
        }

        let outputs = self
            .node_order
            .iter()
            .filter(|id| self.nodes[*id].kind() == "output")
            .filter_map(|id| {
                ctx.state()
                    .get(&output_key(id))
                    .map(|v| (id.clone(), v.clone()))
            })
            .collect();

        Ok(RunReport {
            run_id: ctx.run_id().to_string(),
            started_at: ctx.started_at().to_rfc3339(),
            outputs,
            state: ctx.state().to_json(),
            steps: trace.len(),
            trace,
            truncated,
        })
    }
}

fn enqueue(queue: &mut VecDeque<String>, id: &str) {
    if !queue.iter().any(|queued| queued == id) {
        queue.push_back(id.to_string());
    }
}
