//! Entry, constant and sink nodes

use super::{output_key, parse_params, INPUT, OUTPUT};
use crate::component::context::RunContext;
use crate::component::error::{GraphError, SwitchyardError};
use crate::component::{Component, Ports};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// State key holding the run input
pub const RUN_INPUT_KEY: &str = "input";

/// Emits the run input
pub struct InputNode {
    id: String,
}

impl InputNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Component for InputNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "input"
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[OUTPUT]
    }

    async fn run(&self, _inputs: &Ports, ctx: &mut RunContext) -> Result<Ports, SwitchyardError> {
        let value = ctx
            .state()
            .get(RUN_INPUT_KEY)
            .cloned()
            .unwrap_or(Value::Null);
        Ok(Ports::from([(OUTPUT.to_string(), value)]))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TextParams {
    value: Option<Value>,
}

/// Emits a constant, or forwards its input when no constant is configured
pub struct TextNode {
    id: String,
    value: Option<Value>,
}

impl TextNode {
    pub fn new(id: impl Into<String>, params: &Value) -> Result<Self, GraphError> {
        let id = id.into();
        let params: TextParams = parse_params(&id, params)?;
        Ok(Self {
            id,
            value: params.value,
        })
    }
}

#[async_trait]
impl Component for TextNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "text"
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[OUTPUT]
    }

    async fn run(&self, inputs: &Ports, _ctx: &mut RunContext) -> Result<Ports, SwitchyardError> {
        let value = self
            .value
            .clone()
            .or_else(|| inputs.get(INPUT).cloned())
            .unwrap_or(Value::Null);
        Ok(Ports::from([(OUTPUT.to_string(), value)]))
    }
}

/// Records whatever reaches it into the run state
pub struct OutputNode {
    id: String,
}

impl OutputNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Component for OutputNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "output"
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[]
    }

    async fn run(&self, inputs: &Ports, ctx: &mut RunContext) -> Result<Ports, SwitchyardError> {
        let value = inputs.get(INPUT).cloned().unwrap_or(Value::Null);
        ctx.state_mut().set(&output_key(&self.id), value);
        Ok(Ports::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_input_node_emits_run_input() {
        let mut ctx = RunContext::new();
        ctx.state_mut().set(RUN_INPUT_KEY, json!("hello"));

        let out = InputNode::new("in").run(&Ports::new(), &mut ctx).await.unwrap();
        assert_eq!(out[OUTPUT], json!("hello"));
    }

    #[tokio::test]
    async fn test_text_node_prefers_constant() {
        let mut ctx = RunContext::new();
        let node = TextNode::new("t", &json!({"value": "fixed"})).unwrap();
        let inputs = Ports::from([(INPUT.to_string(), json!("incoming"))]);

        let out = node.run(&inputs, &mut ctx).await.unwrap();
        assert_eq!(out[OUTPUT], json!("fixed"));
    }

    #[tokio::test]
    async fn test_text_node_forwards_without_constant() {
        let mut ctx = RunContext::new();
        let node = TextNode::new("t", &Value::Null).unwrap();
        let inputs = Ports::from([(INPUT.to_string(), json!("incoming"))]);

        let out = node.run(&inputs, &mut ctx).await.unwrap();
        assert_eq!(out[OUTPUT], json!("incoming"));
    }

    #[tokio::test]
    async fn test_output_node_records_into_state() {
        let mut ctx = RunContext::new();
        let inputs = Ports::from([(INPUT.to_string(), json!({"answer": 42}))]);

        let out = OutputNode::new("sink").run(&inputs, &mut ctx).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(ctx.state().get("output.sink"), Some(&json!({"answer": 42})));
    }
}
