// SPDX-License-Identifier: MIT

//! Graph component wrapping the conditional router

use super::{parse_params, INPUT};
use crate::component::context::RunContext;
use crate::component::error::{GraphError, SwitchyardError};
use crate::component::{value_to_text, Component, Ports};
use crate::workflow::branch::{BranchState, ConditionalRouter, GuardConfig, Operator, Route};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Router settings as written in a graph file.
///
/// `input_text`, `match_text` and `message` act as fallbacks for the inputs
/// of the same name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouterParams {
    #[serde(default)]
    pub input_text: Option<String>,
    #[serde(default)]
    pub match_text: Option<String>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub operator: Operator,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(flatten)]
    pub guard: GuardConfig,
}

pub struct RouterNode {
    router: ConditionalRouter,
    params: RouterParams,
}

impl RouterNode {
    pub fn new(id: impl Into<String>, params: &Value) -> Result<Self, GraphError> {
        let id = id.into();
        let params: RouterParams = parse_params(&id, params)?;
        if params.guard.max_iterations == 0 {
            return Err(GraphError::invalid_param(
                id,
                "max_iterations",
                "must be at least 1",
            ));
        }
        if let Operator::Unrecognized(label) = &params.operator {
            log::warn!("Router {} uses unrecognized operator '{}'", id, label);
        }

        Ok(Self {
            router: ConditionalRouter::new(id, params.guard.clone()),
            params,
        })
    }

    fn branch_state(&self, inputs: &Ports) -> BranchState<Value> {
        let input_text = inputs
            .get("input_text")
            .or_else(|| inputs.get(INPUT))
            .map(value_to_text)
            .or_else(|| self.params.input_text.clone())
            .unwrap_or_default();
        let match_text = inputs
            .get("match_text")
            .map(value_to_text)
            .or_else(|| self.params.match_text.clone())
            .unwrap_or_default();
        let message = inputs
            .get("message")
            .cloned()
            .or_else(|| self.params.message.clone())
            .unwrap_or_else(|| Value::String(input_text.clone()));

        BranchState::new(input_text, match_text, message)
            .with_operator(self.params.operator.clone())
            .case_sensitive(self.params.case_sensitive)
    }
}

#[async_trait]
impl Component for RouterNode {
    fn id(&self) -> &str {
        self.router.id()
    }

    fn kind(&self) -> &'static str {
        "router"
    }

    fn outputs(&self) -> &'static [&'static str] {
        &Route::ALL
    }

    async fn run(&self, inputs: &Ports, ctx: &mut RunContext) -> Result<Ports, SwitchyardError> {
        let branch = self.branch_state(inputs);

        let mut invocation = self.router.begin(&branch, ctx);
        let true_value = invocation.true_response()?;
        let false_value = invocation.false_response()?;
        let decision = invocation.finish()?;

        log::info!(
            "Router {} took {} (result={}, iteration={}{})",
            self.id(),
            decision.taken,
            decision.result,
            decision.iteration,
            if decision.forced { ", forced" } else { "" }
        );

        let empty = || Value::String(String::new());
        Ok(Ports::from([
            (
                Route::TrueResult.as_str().to_string(),
                true_value.unwrap_or_else(empty),
            ),
            (
                Route::FalseResult.as_str().to_string(),
                false_value.unwrap_or_else(empty),
            ),
        ]))
    }
}
