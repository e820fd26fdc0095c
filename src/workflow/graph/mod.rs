// SPDX-License-Identifier: MIT

//! Graph-based workflow execution
//!
//! This module provides the runner that drives components along edges,
//! pruning the edges components stop.

pub mod executor;

pub use executor::{GraphRunner, RunReport, RunnerConfig, MAX_STEPS_ENV};
