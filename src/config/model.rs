// src/config/model.rs

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::engine::TaskName;

/// Top-level configuration as read from disk.
///
/// JSON (the default `tasktui.config.json`):
///
/// ```json
/// {
///   "tasks": {
///     "build": { "command": "cargo build" },
///     "test": { "command": "cargo test", "dependsOn": ["build"] },
///     "docs": { "command": "mdbook serve", "cwd": "./book" }
///   }
/// }
/// ```
///
/// or the equivalent TOML:
///
/// ```toml
/// [tasks.test]
/// command = "cargo test"
/// depends_on = ["build"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// All tasks, keyed by task name, in declaration order.
    #[serde(default)]
    pub tasks: IndexMap<String, TaskConfig>,
}

/// A single `tasks.<name>` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    /// Shell command, run through `sh -c`.
    pub command: String,

    /// Working directory. Relative paths are resolved against the directory
    /// tasktui was started from; `None` means that directory itself.
    #[serde(default, alias = "workingDirectory", alias = "working_directory")]
    pub cwd: Option<PathBuf>,

    /// Names of tasks that must finish before this one starts.
    ///
    /// Names are not checked here; a missing dependency is reported on the
    /// dependent task when the engine loads the config.
    #[serde(default, alias = "depends_on")]
    pub depends_on: Vec<String>,
}

/// Engine-facing, fully resolved task definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub name: TaskName,
    pub command: String,
    pub working_directory: PathBuf,
    pub depends_on: Vec<TaskName>,
}

impl TaskDefinition {
    pub fn from_config(name: TaskName, cfg: &TaskConfig, base_dir: &Path) -> Self {
        let working_directory = match &cfg.cwd {
            Some(cwd) if cwd.is_absolute() => cwd.clone(),
            Some(cwd) => base_dir.join(cwd),
            None => base_dir.to_path_buf(),
        };

        Self {
            name,
            command: cfg.command.clone(),
            working_directory,
            depends_on: cfg.depends_on.clone(),
        }
    }
}

/// The set of tasks supplied by one config (re)load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRegistry {
    tasks: IndexMap<TaskName, TaskDefinition>,
}

impl TaskRegistry {
    /// Resolve every task of `cfg` against `base_dir`.
    pub fn from_config(cfg: &ConfigFile, base_dir: &Path) -> Self {
        let tasks = cfg
            .tasks
            .iter()
            .map(|(name, tc)| {
                (
                    name.clone(),
                    TaskDefinition::from_config(name.clone(), tc, base_dir),
                )
            })
            .collect();
        Self { tasks }
    }

    pub fn from_definitions(defs: impl IntoIterator<Item = TaskDefinition>) -> Self {
        let tasks = defs
            .into_iter()
            .map(|def| (def.name.clone(), def))
            .collect();
        Self { tasks }
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Definitions in declaration order, which is also dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
