// src/engine/state.rs

//! Shared run state observed by the renderer.

use std::collections::{HashMap, HashSet};

use crate::engine::TaskName;
use crate::engine::queue::ReadyQueue;
use crate::types::TaskExit;

/// Lifecycle record and accumulated output of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBuffer {
    pub running: bool,
    pub errored: bool,
    /// Combined stdout + stderr, in arrival order.
    pub text: String,
    /// Set once the process has exited.
    pub exit: Option<TaskExit>,
}

impl TaskBuffer {
    /// Buffer of a task whose process has just started.
    pub fn started() -> Self {
        Self {
            running: true,
            ..Self::default()
        }
    }

    /// Buffer of a task that names a dependency missing from the registry.
    pub fn gate_failed(missing_dep: &str) -> Self {
        Self {
            running: false,
            errored: true,
            text: format!("Cannot depend on {missing_dep} as it does not exist"),
            exit: None,
        }
    }

    /// A dependency is resolved once it is no longer running, whatever its
    /// outcome.
    pub fn is_resolved(&self) -> bool {
        !self.running
    }

    pub fn status(&self) -> TaskStatus {
        match (self.running, self.errored) {
            (true, _) => TaskStatus::Running,
            (false, true) => TaskStatus::Failed,
            (false, false) => TaskStatus::Succeeded,
        }
    }
}

/// Coarse task status used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Queued,
    Succeeded,
    Failed,
}

/// Task names grouped the way the sidebar shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOrder<'a> {
    /// Running tasks, in spawn order.
    pub running: Vec<&'a str>,
    /// Queued tasks, in queue order.
    pub queued: Vec<&'a str>,
    /// Finished (or gate-failed) tasks, in spawn order.
    pub completed: Vec<&'a str>,
}

impl<'a> DisplayOrder<'a> {
    /// All entries flattened: running, then queued, then completed.
    pub fn entries(&self) -> Vec<&'a str> {
        self.running
            .iter()
            .chain(self.queued.iter())
            .chain(self.completed.iter())
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.running.len() + self.queued.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All mutable state of one tasktui invocation.
///
/// Owned and mutated by [`CoreRuntime`](crate::engine::CoreRuntime) only;
/// observers get a shared reference.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub(crate) task_order: Vec<TaskName>,
    pub(crate) buffers: HashMap<TaskName, TaskBuffer>,
    pub(crate) queue: ReadyQueue,
    pub(crate) selected: Option<TaskName>,
    pub(crate) last_error: Option<String>,
    pub(crate) spawned: HashSet<TaskName>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names in the order they were spawned or gate-failed.
    pub fn task_order(&self) -> &[TaskName] {
        &self.task_order
    }

    pub fn buffer(&self, name: &str) -> Option<&TaskBuffer> {
        self.buffers.get(name)
    }

    pub fn queue(&self) -> &ReadyQueue {
        &self.queue
    }

    pub fn selected_task(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the task was already dispatched (spawned, queued or gated)
    /// by an earlier load.
    pub fn was_dispatched(&self, name: &str) -> bool {
        self.spawned.contains(name)
    }

    pub fn status_of(&self, name: &str) -> Option<TaskStatus> {
        if let Some(buffer) = self.buffers.get(name) {
            return Some(buffer.status());
        }
        self.queue.contains(name).then_some(TaskStatus::Queued)
    }

    pub fn running_count(&self) -> usize {
        self.buffers.values().filter(|b| b.running).count()
    }

    pub fn display_order(&self) -> DisplayOrder<'_> {
        let mut order = DisplayOrder::default();

        for name in self.task_order.iter() {
            match self.buffers.get(name) {
                Some(buffer) if buffer.running => order.running.push(name.as_str()),
                Some(_) => order.completed.push(name.as_str()),
                None => {}
            }
        }
        order.queued = self.queue.iter().map(|item| item.name.as_str()).collect();

        order
    }

    pub(crate) fn record_gate_failure(&mut self, name: &str, missing_dep: &str) {
        self.buffers
            .insert(name.to_string(), TaskBuffer::gate_failed(missing_dep));
        self.task_order.push(name.to_string());
    }
}
