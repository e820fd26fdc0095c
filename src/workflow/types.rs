// SPDX-License-Identifier: MIT

//! YAML schema types for graph definitions

use crate::workflow::nodes::{INPUT, OUTPUT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level graph definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GraphDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Nodes in definition order; entry nodes run in this order
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
}

/// A node in the graph
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NodeDefinition {
    /// Unique node identifier
    pub id: String,
    /// Component kind: input, text, router, notify, listen, output
    pub kind: String,
    /// Component-specific settings
    #[serde(default)]
    pub params: Value,
}

/// A directed connection from one node's output to another node's input
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct EdgeDefinition {
    pub from: String,
    #[serde(default = "default_output")]
    pub output: String,
    pub to: String,
    #[serde(default = "default_input")]
    pub input: String,
}

fn default_output() -> String {
    OUTPUT.to_string()
}

fn default_input() -> String {
    INPUT.to_string()
}
