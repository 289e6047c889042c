#![allow(dead_code)]

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use tasktui::config::{ConfigFile, TaskConfig, TaskDefinition, TaskRegistry};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    tasks: IndexMap<String, TaskConfig>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            tasks: IndexMap::new(),
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.tasks.insert(name.to_string(), task);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile { tasks: self.tasks }
    }

    /// Resolve against `/` (no task in these tests cares about its cwd).
    pub fn build_registry(self) -> TaskRegistry {
        self.build_registry_in(Path::new("/"))
    }

    pub fn build_registry_in(self, base_dir: &Path) -> TaskRegistry {
        TaskRegistry::from_config(&self.build(), base_dir)
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            task: TaskConfig {
                command: command.to_string(),
                cwd: None,
                depends_on: vec![],
            },
        }
    }

    pub fn depends_on(mut self, dep: &str) -> Self {
        self.task.depends_on.push(dep.to_string());
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.task.cwd = Some(cwd.into());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}

/// Shorthand for a resolved task definition.
pub fn task(name: &str, command: &str, deps: &[&str]) -> TaskDefinition {
    TaskDefinition {
        name: name.to_string(),
        command: command.to_string(),
        working_directory: PathBuf::from("/"),
        depends_on: deps.iter().map(|d| d.to_string()).collect(),
    }
}

/// Registry from `(name, deps)` pairs, commands are `echo <name>`.
pub fn registry(tasks: &[(&str, &[&str])]) -> TaskRegistry {
    TaskRegistry::from_definitions(
        tasks
            .iter()
            .map(|(name, deps)| task(name, &format!("echo {name}"), deps)),
    )
}
