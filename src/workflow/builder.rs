// SPDX-License-Identifier: MIT

//! Compiles graph definitions into runnable graphs

use crate::component::error::{GraphError, SwitchyardError};
use crate::component::Component;
use crate::workflow::graph::{GraphRunner, RunnerConfig};
use crate::workflow::loader::GraphLoader;
use crate::workflow::nodes::{InputNode, ListenNode, NotifyNode, OutputNode, RouterNode, TextNode};
use crate::workflow::types::{GraphDefinition, NodeDefinition};
use std::path::Path;
use std::sync::Arc;

pub struct Builder {
    config: RunnerConfig,
    loader: GraphLoader,
}

impl Builder {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            loader: GraphLoader::new(),
        }
    }

    /// Load a graph file and compile it
    pub fn build_graph<P: AsRef<Path>>(&self, path: P) -> Result<GraphRunner, SwitchyardError> {
        let def = self.loader.load_graph(path)?;
        self.build_from_def(&def)
    }

    /// Compile an already parsed definition
    pub fn build_from_def(&self, def: &GraphDefinition) -> Result<GraphRunner, SwitchyardError> {
        let components = def
            .nodes
            .iter()
            .map(build_component)
            .collect::<Result<Vec<_>, _>>()?;

        let runner = GraphRunner::new(
            def.name.clone(),
            def.description.clone(),
            components,
            def.edges.clone(),
            self.config.clone(),
        )?;

        log::info!(
            "Built graph {} with {} nodes and {} edges",
            def.name,
            def.nodes.len(),
            def.edges.len()
        );
        Ok(runner)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

fn build_component(def: &NodeDefinition) -> Result<Arc<dyn Component>, GraphError> {
    let id = def.id.as_str();
    let component: Arc<dyn Component> = match def.kind.as_str() {
        "input" => Arc::new(InputNode::new(id)),
        "text" => Arc::new(TextNode::new(id, &def.params)?),
        "router" => Arc::new(RouterNode::new(id, &def.params)?),
        "notify" => Arc::new(NotifyNode::new(id, &def.params)?),
        "listen" => Arc::new(ListenNode::new(id, &def.params)?),
        "output" => Arc::new(OutputNode::new(id)),
        other => {
            return Err(GraphError::UnknownKind {
                node: id.to_string(),
                kind: other.to_string(),
            })
        }
    };
    Ok(component)
}
