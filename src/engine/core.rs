// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated [`RunState`]
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - starting processes through the executor backend
//! - rendering and error reporting through the observer
//! - the shutdown sequence
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, or processes.

use tracing::{debug, info};

use crate::config::TaskRegistry;
use crate::engine::event_handlers::{
    CoreCommand, CoreStep, advance_queue, handle_config_loaded, handle_navigate,
    handle_spawn_failed, handle_task_exited, handle_task_output, handle_task_spawned,
};
use crate::engine::state::RunState;
use crate::engine::RuntimeEvent;

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug, Default)]
pub struct CoreRuntime {
    state: RunState,
    registry: TaskRegistry,
    initialized: bool,
    shutting_down: bool,
}

impl CoreRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view for observers and tests.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Handle a single runtime event, updating state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ConfigLoaded(registry) => self.initialize(registry),
            RuntimeEvent::ConfigFailed(message) => self.report_config_error(message),
            RuntimeEvent::TaskSpawned { task } => {
                CoreStep::continue_with(handle_task_spawned(&mut self.state, task))
            }
            RuntimeEvent::SpawnFailed { task, error } => {
                CoreStep::continue_with(handle_spawn_failed(&mut self.state, task, error))
            }
            RuntimeEvent::TaskOutput { task, text } => {
                CoreStep::continue_with(handle_task_output(&mut self.state, task, text))
            }
            RuntimeEvent::TaskExited { task, exit } => {
                let spawning_allowed = !self.shutting_down;
                CoreStep::continue_with(handle_task_exited(
                    &mut self.state,
                    task,
                    exit,
                    spawning_allowed,
                ))
            }
            RuntimeEvent::Navigate(steps) => self.move_selection(steps),
            RuntimeEvent::QuitRequested => self.request_quit(),
            RuntimeEvent::View(_) => CoreStep::continue_with(vec![CoreCommand::Render]),
        }
    }

    /// Load (or reload) the task set.
    ///
    /// An empty task set after a previous load is the signal to shut down.
    pub fn initialize(&mut self, registry: TaskRegistry) -> CoreStep {
        if self.shutting_down {
            debug!("ignoring config load during shutdown");
            return CoreStep::continue_with(Vec::new());
        }

        if registry.is_empty() && self.initialized {
            info!("config no longer defines any task; shutting down");
            return self.request_quit();
        }

        info!(tasks = registry.len(), reload = self.initialized, "config loaded");
        self.initialized = true;
        self.registry = registry;

        let mut commands = handle_config_loaded(&mut self.state, &self.registry);
        // Dependencies that already finished (earlier loads) or failed the
        // gate release their dependents right away.
        commands.extend(advance_queue(&mut self.state, true));
        commands.push(CoreCommand::Render);

        CoreStep::continue_with(commands)
    }

    pub fn move_selection(&mut self, steps: i32) -> CoreStep {
        CoreStep::continue_with(handle_navigate(&mut self.state, steps))
    }

    pub fn request_quit(&mut self) -> CoreStep {
        if !self.shutting_down {
            info!("quit requested");
            self.shutting_down = true;
        }
        CoreStep::shutdown()
    }

    fn report_config_error(&mut self, message: String) -> CoreStep {
        self.state.last_error = Some(message.clone());
        CoreStep::continue_with(vec![
            CoreCommand::ReportError(message),
            CoreCommand::Render,
        ])
    }
}
