// SPDX-License-Identifier: MIT

//! Run-scoped state storage
//!
//! This module provides:
//! - `RunState` - keyed JSON storage shared by every node of one run
//! - `Reducer` - how a write is merged into an existing entry

mod store;

pub use store::{Reducer, RunState};
