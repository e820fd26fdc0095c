//! Graph loader - YAML file loading and parsing

use super::types::GraphDefinition;
use crate::component::error::SwitchyardError;
use std::fs;
use std::path::Path;

/// Loads graph definitions from YAML files
pub struct GraphLoader;

impl GraphLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a graph definition from a YAML file
    pub fn load_graph<P: AsRef<Path>>(&self, path: P) -> Result<GraphDefinition, SwitchyardError> {
        let path = path.as_ref();
        log::debug!("Loading graph from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse a graph definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<GraphDefinition, SwitchyardError> {
        let def: GraphDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self::new()
    }
}
