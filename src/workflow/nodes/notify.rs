// SPDX-License-Identifier: MIT

//! Named notifications through run state
//!
//! `notify` writes a record under a name, `listen` reads it back. The runner
//! re-activates every listener of a name each time a notifier writes it.

use super::{parse_params, INPUT, OUTPUT};
use crate::component::context::RunContext;
use crate::component::error::{GraphError, SwitchyardError};
use crate::component::{Component, Ports};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON-object record; plain text lives under the `text` key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data {
    data: Map<String, Value>,
}

impl Data {
    pub fn text(text: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("text".to_string(), Value::String(text.into()));
        Self { data }
    }

    /// Normalize an arbitrary value into a record.
    ///
    /// Objects are kept as-is, strings become `{"text": s}`, falsy values
    /// become `{"text": ""}` and anything else is rendered as text.
    pub fn from_value(value: Value) -> Self {
        if is_falsy(&value) {
            return Self::text("");
        }
        match value {
            Value::Object(data) => Self { data },
            Value::String(s) => Self::text(s),
            other => Self::text(other.to_string()),
        }
    }

    pub fn get_text(&self) -> Option<&str> {
        self.data.get("text").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[derive(Debug, Deserialize)]
struct NotifyParams {
    name: Option<String>,
    #[serde(default)]
    append: bool,
    #[serde(default)]
    data: Option<Value>,
}

/// Stores a record under a name, overwriting or appending
pub struct NotifyNode {
    id: String,
    name: String,
    append: bool,
    data: Option<Value>,
}

impl NotifyNode {
    pub fn new(id: impl Into<String>, params: &Value) -> Result<Self, GraphError> {
        let id = id.into();
        let params: NotifyParams = parse_params(&id, params)?;
        let name = match params.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(GraphError::missing_param(id, "name")),
        };

        Ok(Self {
            id,
            name,
            append: params.append,
            data: params.data,
        })
    }
}

#[async_trait]
impl Component for NotifyNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "notify"
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[OUTPUT]
    }

    fn notifies(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    async fn run(&self, inputs: &Ports, ctx: &mut RunContext) -> Result<Ports, SwitchyardError> {
        let raw = inputs
            .get("data")
            .or_else(|| inputs.get(INPUT))
            .cloned()
            .or_else(|| self.data.clone())
            .unwrap_or(Value::Null);
        let record = Data::from_value(raw).into_value();

        if self.append {
            ctx.state_mut().append(&self.name, record.clone());
        } else {
            ctx.state_mut().set(&self.name, record.clone());
        }
        log::debug!(
            "Notify {} {} '{}'",
            self.id,
            if self.append { "appended to" } else { "updated" },
            self.name
        );

        Ok(Ports::from([(OUTPUT.to_string(), record)]))
    }
}

#[derive(Debug, Deserialize)]
struct ListenParams {
    name: Option<String>,
}

/// Emits the current record stored under a name
pub struct ListenNode {
    id: String,
    name: String,
}

impl ListenNode {
    pub fn new(id: impl Into<String>, params: &Value) -> Result<Self, GraphError> {
        let id = id.into();
        let params: ListenParams = parse_params(&id, params)?;
        let name = match params.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(GraphError::missing_param(id, "name")),
        };
        Ok(Self { id, name })
    }
}

#[async_trait]
impl Component for ListenNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        "listen"
    }

    fn outputs(&self) -> &'static [&'static str] {
        &[OUTPUT]
    }

    fn listens(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    async fn run(&self, _inputs: &Ports, ctx: &mut RunContext) -> Result<Ports, SwitchyardError> {
        let value = ctx.state().get(&self.name).cloned().unwrap_or(Value::Null);
        Ok(Ports::from([(OUTPUT.to_string(), value)]))
    }
}
