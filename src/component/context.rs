// SPDX-License-Identifier: MIT

//! Host capabilities handed to components during a run
//!
//! Components never see the graph itself. They get a narrow capability:
//! keyed counters that live as long as the run, and a signal to stop one of
//! their own output edges.

use crate::component::error::ContextError;
use crate::workflow::state::RunState;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Capability the host graph exposes to a running component.
///
/// Implementations must serialize access per node id; the router performs
/// read-increment-write on its counter without locking.
pub trait HostContext {
    /// Read a run-scoped counter, `0` when it was never written
    fn counter(&self, key: &str) -> Result<u64, ContextError>;

    /// Persist a run-scoped counter
    fn set_counter(&mut self, key: &str, value: u64) -> Result<(), ContextError>;

    /// Prune `edge` of `node_id` from further traversal in this invocation
    fn stop_edge(&mut self, node_id: &str, edge: &str) -> Result<(), ContextError>;
}

/// In-memory run context owned by one graph run
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    state: RunState,
    stopped: HashMap<String, HashSet<String>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: RunState::empty(),
            stopped: HashMap::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    /// Reset per-invocation bookkeeping before `node_id` runs again
    pub fn begin_invocation(&mut self, node_id: &str) {
        self.stopped.remove(node_id);
    }

    /// Whether `edge` of `node_id` was stopped during its latest invocation
    pub fn is_stopped(&self, node_id: &str, edge: &str) -> bool {
        self.stopped
            .get(node_id)
            .is_some_and(|edges| edges.contains(edge))
    }

    /// Edges stopped during the latest invocation of `node_id`
    pub fn stopped_edges(&self, node_id: &str) -> Vec<&str> {
        let mut edges: Vec<&str> = self
            .stopped
            .get(node_id)
            .map(|edges| edges.iter().map(|e| e.as_str()).collect())
            .unwrap_or_default();
        edges.sort_unstable();
        edges
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl HostContext for RunContext {
    fn counter(&self, key: &str) -> Result<u64, ContextError> {
        Ok(self.state.get(key).and_then(Value::as_u64).unwrap_or(0))
    }

    fn set_counter(&mut self, key: &str, value: u64) -> Result<(), ContextError> {
        self.state.set(key, Value::from(value));
        Ok(())
    }

    fn stop_edge(&mut self, node_id: &str, edge: &str) -> Result<(), ContextError> {
        log::debug!("Run {}: stopping edge {}.{}", self.run_id, node_id, edge);
        self.stopped
            .entry(node_id.to_string())
            .or_default()
            .insert(edge.to_string());
        Ok(())
    }
}
