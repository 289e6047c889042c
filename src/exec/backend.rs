// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation here.
//!
//! - `ProcessExecutor` is the default implementation used by `tasktui`. It
//!   starts `sh -c <command>` and hands the child to a supervising Tokio task
//!   (see [`task_runner`](super::task_runner)) that reports back through
//!   `RuntimeEvent`s.
//! - Tests can provide their own `ExecutorBackend` that, for example, records
//!   which tasks were launched and emits `TaskExited` events on demand.

use std::io;
use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::config::TaskDefinition;
use crate::engine::RuntimeEvent;
use crate::errors::{Result, TaskTuiError};
use crate::types::ProcessSignal;

use super::task_runner::supervise;

/// Environment added to every task so tools keep emitting ANSI colours even
/// though their output goes to a pipe.
pub const COLOR_ENV: [(&str, &str); 2] = [("FORCE_COLOR", "1"), ("CLICOLOR_FORCE", "1")];

/// Trait abstracting how tasks are started.
///
/// `launch` is synchronous: on `Ok` the process is running and the runtime
/// immediately records the task as started.
pub trait ExecutorBackend: Send {
    fn launch(&mut self, task: &TaskDefinition) -> Result<Box<dyn ProcessHandle>>;
}

/// Handle to a live task process, kept by the runtime until the task exits.
pub trait ProcessHandle: Send {
    /// OS process id, if known.
    fn id(&self) -> Option<u32>;

    /// Deliver `signal` to the process (and its process group on Unix).
    ///
    /// A process that already exited is not an error.
    fn signal(&mut self, signal: ProcessSignal) -> io::Result<()>;
}

/// Real executor backend used in production.
pub struct ProcessExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl ProcessExecutor {
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self { runtime_tx }
    }
}

impl ExecutorBackend for ProcessExecutor {
    fn launch(&mut self, task: &TaskDefinition) -> Result<Box<dyn ProcessHandle>> {
        info!(
            task = %task.name,
            cmd = %task.command,
            cwd = %task.working_directory.display(),
            "starting task process"
        );

        let mut cmd = shell_command(&task.command);
        cmd.current_dir(&task.working_directory)
            .envs(COLOR_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so the whole subtree can be signalled at once.
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|source| TaskTuiError::SpawnError {
            task: task.name.clone(),
            source,
        })?;

        let pid = child.id();
        debug!(task = %task.name, ?pid, "task process spawned");

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        tokio::spawn(supervise(
            task.name.clone(),
            child,
            self.runtime_tx.clone(),
            cancel_rx,
        ));

        Ok(Box::new(ChildProcess {
            pid,
            cancel: Some(cancel_tx),
        }))
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Handle for a process started by [`ProcessExecutor`].
///
/// On Unix signals go to the process group through `killpg`. Elsewhere the
/// supervising task is asked to kill the child via `cancel`.
struct ChildProcess {
    pid: Option<u32>,
    cancel: Option<oneshot::Sender<()>>,
}

impl ProcessHandle for ChildProcess {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    #[cfg(unix)]
    fn signal(&mut self, signal: ProcessSignal) -> io::Result<()> {
        let result = match self.pid {
            Some(pid) => super::signal::signal_process_group(pid, signal),
            None => Ok(()),
        };

        // Also kill the leader directly, in case it left its group.
        if signal == ProcessSignal::Kill {
            if let Some(cancel) = self.cancel.take() {
                let _ = cancel.send(());
            }
        }

        result
    }

    #[cfg(not(unix))]
    fn signal(&mut self, _signal: ProcessSignal) -> io::Result<()> {
        if let Some(cancel) = self.cancel.take() {
            // The receiver is gone once the process has exited.
            let _ = cancel.send(());
        }
        Ok(())
    }
}
