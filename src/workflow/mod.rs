// SPDX-License-Identifier: MIT

pub mod branch;
pub mod builder;
pub mod graph;
pub mod loader;
pub mod nodes;
pub mod state;
pub mod types;
