// SPDX-License-Identifier: MIT

//! Runtime state storage for a single graph run

use serde_json::Value;
use std::collections::HashMap;

/// How a write is merged into an existing state entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reducer {
    /// Replace the value (default)
    #[default]
    Overwrite,
    /// Append to an array, promoting a scalar entry to a one-element array
    Append,
}

/// Keyed state scoped to one run
#[derive(Debug, Clone, Default)]
pub struct RunState {
    fields: HashMap<String, Value>,
}

impl RunState {
    /// Create an empty RunState
    pub fn empty() -> Self {
        Self::default()
    }

    /// Update a field using the given reducer
    pub fn update(&mut self, key: &str, value: Value, reducer: Reducer) {
        match reducer {
            Reducer::Overwrite => {
                self.fields.insert(key.to_string(), value);
            }
            Reducer::Append => {
                let entry = self
                    .fields
                    .entry(key.to_string())
                    .or_insert(Value::Array(vec![]));
                if !entry.is_array() {
                    let previous = entry.take();
                    *entry = Value::Array(vec![previous]);
                }
                if let Value::Array(items) = entry {
                    items.push(value);
                }
            }
        }
    }

    /// Overwrite a field
    pub fn set(&mut self, key: &str, value: Value) {
        self.update(key, value, Reducer::Overwrite);
    }

    /// Append to a field
    pub fn append(&mut self, key: &str, value: Value) {
        self.update(key, value, Reducer::Append);
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Convert state to JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_state() {
        let state = RunState::empty();
        assert!(state.get("anything").is_none());
        assert_eq!(state.to_json(), json!({}));
    }

    #[test]
    fn test_overwrite() {
        let mut state = RunState::empty();

        state.set("value", json!("first"));
        assert_eq!(state.get("value"), Some(&json!("first")));

        state.set("value", json!("second"));
        assert_eq!(state.get("value"), Some(&json!("second")));
    }

    #[test]
    fn test_append() {
        let mut state = RunState::empty();

        state.append("items", json!({"text": "a"}));
        state.append("items", json!({"text": "b"}));
        assert_eq!(
            state.get("items"),
            Some(&json!([{"text": "a"}, {"text": "b"}]))
        );
    }

    #[test]
    fn test_append_promotes_scalar() {
        let mut state = RunState::empty();

        state.set("items", json!("lonely"));
        state.append("items", json!("friend"));
        assert_eq!(state.get("items"), Some(&json!(["lonely", "friend"])));
    }

    #[test]
    fn test_to_json() {
        let mut state = RunState::empty();
        state.set("a", json!(1));
        state.set("b", json!("hello"));

        let json = state.to_json();
        assert_eq!(json["a"], 1);
        assert_eq!(json["b"], "hello");
    }

    #[test]
    fn test_default_reducer_overwrites() {
        let mut state = RunState::empty();
        state.update("value", json!(1), Reducer::default());
        state.update("value", json!(2), Reducer::default());
        assert_eq!(state.get("value"), Some(&json!(2)));
    }
}
