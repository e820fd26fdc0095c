// SPDX-License-Identifier: MIT

//! Typed error handling for switchyard-rs
//!
//! Graph definition problems, host context failures and I/O all funnel
//! into `SwitchyardError` so callers can use `?` across module boundaries.

use thiserror::Error;

/// Top-level error type for switchyard-rs
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// Configuration errors (bad env vars, invalid CLI values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph definition or execution errors
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// The host run context broke its contract
    #[error(transparent)]
    Context(#[from] ContextError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Errors raised while validating or compiling a graph definition
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    /// Two nodes share the same id
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge references a node that does not exist
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// Node kind is not one of the built-in components
    #[error("Unknown node kind '{kind}' for node '{node}'")]
    UnknownKind { node: String, kind: String },

    /// An edge leaves a node through an output it does not have
    #[error("Node '{node}' has no output named '{output}'")]
    InvalidOutput { node: String, output: String },

    /// A required parameter is absent
    #[error("Node '{node}' is missing required parameter '{param}'")]
    MissingParam { node: String, param: String },

    /// A parameter is present but unusable
    #[error("Node '{node}' has invalid parameter '{param}': {reason}")]
    InvalidParam {
        node: String,
        param: String,
        reason: String,
    },
}

/// Failures of the host-provided run context
#[derive(Debug, Error, PartialEq)]
pub enum ContextError {
    /// Keyed storage or the edge-stop signal could not be reached
    #[error("Host context unavailable: {0}")]
    HostContextUnavailable(String),
}

impl SwitchyardError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl GraphError {
    pub fn missing_param(node: impl Into<String>, param: impl Into<String>) -> Self {
        Self::MissingParam {
            node: node.into(),
            param: param.into(),
        }
    }

    pub fn invalid_param(
        node: impl Into<String>,
        param: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParam {
            node: node.into(),
            param: param.into(),
            reason: reason.into(),
        }
    }
}

impl From<&str> for SwitchyardError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for SwitchyardError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
