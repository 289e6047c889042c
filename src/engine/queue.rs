// src/engine/queue.rs

//! Ready queue: tasks waiting for their dependencies to finish.

use std::collections::HashMap;

use tracing::debug;

use crate::config::TaskDefinition;
use crate::engine::TaskName;
use crate::engine::state::TaskBuffer;

/// A task that passed the dependency gate but still waits on some of its
/// dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub name: TaskName,
    pub task: TaskDefinition,
    /// Dependencies not yet resolved, in declaration order. Only shrinks.
    pub remaining_deps: Vec<TaskName>,
}

impl QueueItem {
    pub fn new(task: TaskDefinition) -> Self {
        Self {
            name: task.name.clone(),
            remaining_deps: task.depends_on.clone(),
            task,
        }
    }
}

/// Ordered queue of blocked tasks.
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    items: Vec<QueueItem>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: QueueItem) {
        debug!(task = %item.name, deps = ?item.remaining_deps, "queued task");
        self.items.push(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.iter()
    }

    pub fn get(&self, name: &str) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// One evaluation pass over the queue.
    ///
    /// Drops every dependency whose buffer exists and is no longer running
    /// (a failed dependency unblocks its dependents too), then removes and
    /// returns the items with nothing left to wait for, in queue order.
    pub fn advance(&mut self, buffers: &HashMap<TaskName, TaskBuffer>) -> Vec<QueueItem> {
        let mut ready = Vec::new();
        let mut blocked = Vec::with_capacity(self.items.len());

        for mut item in self.items.drain(..) {
            item.remaining_deps.retain(|dep| {
                !buffers.get(dep).is_some_and(TaskBuffer::is_resolved)
            });

            if item.remaining_deps.is_empty() {
                debug!(task = %item.name, "dependencies resolved; task is ready");
                ready.push(item);
            } else {
                blocked.push(item);
            }
        }

        self.items = blocked;
        ready
    }
}
