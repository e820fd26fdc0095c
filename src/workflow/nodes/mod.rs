// SPDX-License-Identifier: MIT

//! Built-in graph components
//!
//! | kind     | inputs                                   | outputs                       |
//! |----------|------------------------------------------|-------------------------------|
//! | `input`  | -                                        | `output`                      |
//! | `text`   | `input`                                  | `output`                      |
//! | `router` | `input_text`/`input`, `match_text`, `message` | `true_result`, `false_result` |
//! | `notify` | `data`/`input`                           | `output`                      |
//! | `listen` | -                                        | `output`                      |
//! | `output` | `input`                                  | -                             |

mod io;
mod notify;
mod router;

pub use io::{InputNode, OutputNode, TextNode, RUN_INPUT_KEY};
pub use notify::{Data, ListenNode, NotifyNode};
pub use router::{RouterNode, RouterParams};

use crate::component::error::GraphError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Default output name for single-output components
pub const OUTPUT: &str = "output";

/// Default input name for edges that do not name one
pub const INPUT: &str = "input";

/// State key under which an `output` node stores what it received
pub fn output_key(node_id: &str) -> String {
    format!("output.{}", node_id)
}

/// Deserialize a node's `params` block; a missing block means all defaults
pub(crate) fn parse_params<P: DeserializeOwned>(node: &str, params: &Value) -> Result<P, GraphError> {
    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other.clone(),
    };
    serde_json::from_value(params)
        .map_err(|e| GraphError::invalid_param(node, "params", e.to_string()))
}
