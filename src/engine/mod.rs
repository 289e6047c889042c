// src/engine/mod.rs

//! Orchestration engine for tasktui.
//!
//! This module ties together:
//! - the shared run state (buffers, display order, selection)
//! - the dependency gate and the ready queue
//! - the main runtime event loop that reacts to:
//!   - config (re)loads
//!   - task output and exit events
//!   - navigation and quit requests
//!   - shutdown, including the escalating signal sequence
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::time::Duration;

use crate::config::TaskRegistry;
use crate::types::TaskExit;

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// How long the shutdown sequencer waits for voluntary exits before
/// force-killing the remaining processes.
pub const DEFAULT_CLEANUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Events flowing into the runtime from the executor, the terminal, the
/// config watcher, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A config (re)load produced a task registry.
    ConfigLoaded(TaskRegistry),
    /// A config (re)load failed; the message is shown to the user.
    ConfigFailed(String),
    /// The executor started the task's process.
    TaskSpawned { task: TaskName },
    /// The executor could not start the task's process.
    SpawnFailed { task: TaskName, error: String },
    /// A chunk of combined stdout/stderr output.
    TaskOutput { task: TaskName, text: String },
    /// The task process exited and both output streams are drained.
    TaskExited { task: TaskName, exit: TaskExit },
    /// Move the selection by this many entries in display order.
    Navigate(i32),
    /// Quit: run the shutdown sequence and stop.
    QuitRequested,
    /// A purely visual request, handled by the observer.
    View(ViewEvent),
}

/// Presentation-only input that does not touch the run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    ToggleHelp,
    DismissError,
    Resized,
}

/// Runtime options for the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Bounded wait shared by all processes during shutdown.
    pub cleanup_timeout: Duration,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            cleanup_timeout: DEFAULT_CLEANUP_TIMEOUT,
        }
    }
}

pub mod core;
pub mod event_handlers;
pub mod gate;
pub mod observer;
pub mod queue;
pub mod runtime;
pub mod state;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use observer::Observer;
pub use queue::{QueueItem, ReadyQueue};
pub use runtime::Runtime;
pub use state::{DisplayOrder, RunState, TaskBuffer, TaskStatus};
