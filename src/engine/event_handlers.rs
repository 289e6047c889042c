// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.
//!
//! Each handler mutates the [`RunState`] and returns the commands the IO
//! shell has to carry out.

use tracing::{debug, info, warn};

use crate::config::{TaskDefinition, TaskRegistry, find_dependency_cycle};
use crate::engine::gate::ensure_dependencies;
use crate::engine::queue::QueueItem;
use crate::engine::state::{RunState, TaskBuffer};
use crate::engine::TaskName;
use crate::types::TaskExit;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Start this task's process.
    Spawn(TaskDefinition),
    /// Redraw from the current state (coalesced per event batch).
    Render,
    /// Show this message through the error reporter.
    ReportError(String),
    /// Run the shutdown sequence and stop.
    Shutdown,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub fn shutdown() -> Self {
        Self {
            commands: vec![CoreCommand::Shutdown],
            keep_running: false,
        }
    }
}

/// Dispatch the tasks of a freshly loaded registry.
///
/// Tasks already dispatched by an earlier load are skipped. Tasks without
/// dependencies are spawned right away; the others go through the
/// dependency gate and into the ready queue.
pub fn handle_config_loaded(state: &mut RunState, registry: &TaskRegistry) -> Vec<CoreCommand> {
    let mut commands = Vec::new();

    if let Some(task) = find_dependency_cycle(registry) {
        let message = format!(
            "Dependency cycle detected involving task '{task}'; tasks on the cycle will never start"
        );
        warn!(task = %task, "dependency cycle in config");
        state.last_error = Some(message.clone());
        commands.push(CoreCommand::ReportError(message));
    }

    for task in registry.iter() {
        if !state.spawned.insert(task.name.clone()) {
            debug!(task = %task.name, "task already dispatched; ignoring on reload");
            continue;
        }

        if task.depends_on.is_empty() {
            commands.push(CoreCommand::Spawn(task.clone()));
            continue;
        }

        if !ensure_dependencies(&task.name, &task.depends_on, registry, state) {
            continue;
        }

        state.queue.push(QueueItem::new(task.clone()));
    }

    commands
}

/// The executor started the task's process.
pub fn handle_task_spawned(state: &mut RunState, task: TaskName) -> Vec<CoreCommand> {
    info!(task = %task, "task started");

    if state.selected.is_none() {
        state.selected = Some(task.clone());
    }
    state.buffers.insert(task.clone(), TaskBuffer::started());
    state.task_order.push(task);

    vec![CoreCommand::Render]
}

/// The executor failed to start the task's process.
pub fn handle_spawn_failed(state: &mut RunState, task: TaskName, error: String) -> Vec<CoreCommand> {
    warn!(task = %task, error = %error, "task failed to start");

    state.last_error = Some(error.clone());
    vec![CoreCommand::ReportError(error), CoreCommand::Render]
}

/// Append an output chunk; only the selected task triggers a redraw.
pub fn handle_task_output(state: &mut RunState, task: TaskName, text: String) -> Vec<CoreCommand> {
    match state.buffers.get_mut(&task) {
        Some(buffer) => buffer.text.push_str(&text),
        None => {
            warn!(task = %task, "output for a task without buffer; dropping");
            return Vec::new();
        }
    }

    if state.selected.as_deref() == Some(task.as_str()) {
        vec![CoreCommand::Render]
    } else {
        Vec::new()
    }
}

/// Record the exit and release dependents that became ready.
pub fn handle_task_exited(
    state: &mut RunState,
    task: TaskName,
    exit: TaskExit,
    spawning_allowed: bool,
) -> Vec<CoreCommand> {
    info!(task = %task, exit = %exit, success = exit.success(), "task exited");

    let buffer = state.buffers.entry(task).or_default();
    buffer.running = false;
    buffer.errored = !exit.success();
    buffer.exit = Some(exit);

    let mut commands = advance_queue(state, spawning_allowed);
    commands.push(CoreCommand::Render);
    commands
}

/// Run one ready-queue pass and turn the ready items into spawn commands.
pub fn advance_queue(state: &mut RunState, spawning_allowed: bool) -> Vec<CoreCommand> {
    if !spawning_allowed {
        return Vec::new();
    }

    state
        .queue
        .advance(&state.buffers)
        .into_iter()
        .map(|item| CoreCommand::Spawn(item.task))
        .collect()
}

/// Move the selection `steps` entries through the display order, wrapping
/// around at both ends.
pub fn handle_navigate(state: &mut RunState, steps: i32) -> Vec<CoreCommand> {
    let entries = state.display_order().entries();
    if entries.is_empty() {
        return Vec::new();
    }

    let len = entries.len() as i64;
    let current = state
        .selected
        .as_deref()
        .and_then(|selected| entries.iter().position(|name| *name == selected));

    let base = match current {
        Some(index) => index as i64,
        None if steps >= 0 => -1,
        None => len,
    };
    let index = (base + i64::from(steps)).rem_euclid(len) as usize;

    let next = entries[index].to_string();
    debug!(task = %next, "selection moved");
    state.selected = Some(next);

    vec![CoreCommand::Render]
}
