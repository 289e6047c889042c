// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, TaskRegistry};
use crate::engine::TaskName;
use crate::errors::{Result, TaskTuiError};

/// Reject structurally malformed configs before they reach the engine.
///
/// Dependencies on unknown tasks are deliberately accepted here: the engine
/// records them on the dependent task instead of refusing the whole file.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    for (name, task) in cfg.tasks.iter() {
        if name.trim().is_empty() {
            return Err(TaskTuiError::ConfigError(
                "task names must not be empty".to_string(),
            ));
        }
        if task.command.trim().is_empty() {
            return Err(TaskTuiError::ConfigError(format!(
                "task '{name}' has an empty command"
            )));
        }
    }
    Ok(())
}

/// Return a task that sits on a dependency cycle, if there is one.
///
/// Edge direction: dep -> task. Edges to unknown tasks are skipped, since
/// those never block (the dependent fails the dependency gate instead).
pub fn find_dependency_cycle(registry: &TaskRegistry) -> Option<TaskName> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in registry.names() {
        graph.add_node(name);
    }

    for task in registry.iter() {
        for dep in task.depends_on.iter() {
            if registry.contains(dep) {
                graph.add_edge(dep.as_str(), task.name.as_str(), ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => None,
        Err(cycle) => Some(cycle.node_id().to_string()),
    }
}
