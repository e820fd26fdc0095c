// SPDX-License-Identifier: MIT

//! Component kit: the trait every graph node implements, plus the host
//! capabilities and error types shared by all components.

pub mod context;
pub mod error;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use context::RunContext;
use error::SwitchyardError;

/// Named values flowing into or out of a component
pub type Ports = HashMap<String, Value>;

/// A node that the graph runner can invoke.
///
/// `run` receives the values delivered to the node's inputs since its last
/// invocation and returns one value per output it produced. Outputs that the
/// component stopped through the run context are pruned by the runner even if
/// they appear in the returned ports.
#[async_trait]
pub trait Component: Send + Sync {
    /// Stable node id, unique within a graph
    fn id(&self) -> &str;

    /// Component kind as written in graph files
    fn kind(&self) -> &'static str;

    /// Output names this component can emit
    fn outputs(&self) -> &'static [&'static str];

    /// State entry this component writes, if it notifies listeners
    fn notifies(&self) -> Option<&str> {
        None
    }

    /// State entry this component reads, if it listens for notifications
    fn listens(&self) -> Option<&str> {
        None
    }

    async fn run(&self, inputs: &Ports, ctx: &mut RunContext) -> Result<Ports, SwitchyardError>;
}

/// Render a port value as plain text; records contribute their `text` field
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}
