// SPDX-License-Identifier: MIT

//! Conditional routing components for node-based workflow graphs.
//!
//! The heart of the crate is [`workflow::branch::ConditionalRouter`], which
//! sends a value down exactly one of two edges and bounds cycles with a
//! run-scoped iteration guard. [`workflow::graph::GraphRunner`] is a small
//! host that runs YAML-defined graphs of such components.

pub mod component;
pub mod workflow;
