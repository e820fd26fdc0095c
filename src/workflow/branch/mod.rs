// SPDX-License-Identifier: MIT

//! Conditional routing for graph workflows
//!
//! A router compares two strings and sends its passthrough value down
//! exactly one of two edges, `true_result` or `false_result`:
//! - `input == match` (`equals`, `not equals`)
//! - substring checks (`contains`, `starts with`, `ends with`)
//!
//! Routers that sit on a cycle carry an iteration guard so a run always
//! leaves the loop through the configured default route.

mod evaluator;
mod operator;
mod router;

pub use evaluator::evaluate_condition;
pub use operator::Operator;
pub use router::{
    iteration_key, BranchState, ConditionalRouter, GuardConfig, Invocation, Route, RouteDecision,
};
