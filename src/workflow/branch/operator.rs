// SPDX-License-Identifier: MIT

//! Comparison operators offered by the router

use serde::{Deserialize, Serialize};

/// Comparison applied between the input text and the match text.
///
/// Labels that do not name a known comparison are kept verbatim in
/// `Unrecognized` instead of being rejected; such an operator never matches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// equals
    #[default]
    Equals,
    /// not equals
    NotEquals,
    /// contains
    Contains,
    /// starts with
    StartsWith,
    /// ends with
    EndsWith,
    /// Anything else
    Unrecognized(String),
}

impl Operator {
    /// The label used in graph files and on the CLI
    pub fn label(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not equals",
            Operator::Contains => "contains",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::Unrecognized(label) => label,
        }
    }
}

impl From<&str> for Operator {
    fn from(label: &str) -> Self {
        match label {
            "equals" => Operator::Equals,
            "not equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "starts with" => Operator::StartsWith,
            "ends with" => Operator::EndsWith,
            other => Operator::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(label: String) -> Self {
        Operator::from(label.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.label().to_string()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
