// src/engine/runtime.rs

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, error, info, warn};

use crate::config::TaskDefinition;
use crate::errors::Result;
use crate::exec::{ExecutorBackend, ProcessHandle};
use crate::types::ProcessSignal;

use super::core::CoreRuntime;
use super::observer::Observer;
use super::{CoreCommand, RuntimeEvent, RuntimeOptions, TaskName};

/// Upper bound for the shutdown wait when the configured timeout does not
/// fit into an `Instant`.
const MAX_CLEANUP_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

/// A process the runtime is responsible for until it exits.
struct LiveProcess {
    handle: Box<dyn ProcessHandle>,
    /// Set once the shutdown sequencer has signalled this process.
    killed: bool,
}

/// Drives the core runtime in response to `RuntimeEvent`s, delegates process
/// creation to an `ExecutorBackend` and drawing to an `Observer`.
///
/// This is the IO shell around `CoreRuntime`, which contains all the state
/// semantics. Only this loop mutates the run state: every event is handled
/// to completion before the next one is read.
pub struct Runtime<E: ExecutorBackend, O: Observer> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    observer: O,
    live: HashMap<TaskName, LiveProcess>,
    options: RuntimeOptions,
}

impl<E: ExecutorBackend, O: Observer> fmt::Debug for Runtime<E, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("live", &self.live.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend, O: Observer> Runtime<E, O> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
        observer: O,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            observer,
            live: HashMap::new(),
            options,
        }
    }

    pub fn core(&self) -> &CoreRuntime {
        &self.core
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Main event loop.
    ///
    /// Runs until a quit request (or an emptied config) has been handled,
    /// or until every sender is gone. The shutdown sequence always runs
    /// before returning, also when rendering failed; the first such error
    /// is returned afterwards. Returns the runtime so callers can inspect
    /// the final state.
    pub async fn run(mut self) -> Result<Self> {
        info!("tasktui runtime started");

        let mut failure = None;
        while let Some(event) = self.event_rx.recv().await {
            match self.dispatch(event) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    error!(error = %e, "runtime step failed; shutting down");
                    failure = Some(e);
                    break;
                }
            }
        }

        // No new task may start while live ones are being stopped.
        self.core.request_quit();
        let cleanup = self.cleanup().await;

        info!("runtime exiting");
        match failure {
            Some(e) => Err(e),
            None => cleanup.map(|()| self),
        }
    }

    /// Feed one event (and the spawn results it causes) through the core,
    /// carry out the resulting commands and render once at the end.
    ///
    /// Returns `false` once the core asked to shut down.
    fn dispatch(&mut self, event: RuntimeEvent) -> Result<bool> {
        debug!(?event, "runtime received event");

        let mut pending = VecDeque::from([event]);
        let mut needs_render = false;
        let mut keep_running = true;

        while let Some(event) = pending.pop_front() {
            match &event {
                RuntimeEvent::View(view) => self.observer.view_event(*view),
                RuntimeEvent::TaskExited { task, .. } => {
                    self.live.remove(task);
                }
                _ => {}
            }

            let step = self.core.step(event);
            keep_running &= step.keep_running;

            for command in step.commands {
                match command {
                    CoreCommand::Spawn(task) => pending.push_back(self.launch(&task)),
                    CoreCommand::Render => needs_render = true,
                    CoreCommand::ReportError(message) => self.observer.report_error(&message),
                    CoreCommand::Shutdown => keep_running = false,
                }
            }
        }

        if needs_render {
            self.observer.render(self.core.state())?;
        }

        Ok(keep_running)
    }

    /// Start a task through the executor and translate the outcome into the
    /// event the core expects next.
    fn launch(&mut self, task: &TaskDefinition) -> RuntimeEvent {
        match self.executor.launch(task) {
            Ok(handle) => {
                debug!(task = %task.name, pid = ?handle.id(), "task launched");
                self.live.insert(
                    task.name.clone(),
                    LiveProcess {
                        handle,
                        killed: false,
                    },
                );
                RuntimeEvent::TaskSpawned {
                    task: task.name.clone(),
                }
            }
            Err(err) => RuntimeEvent::SpawnFailed {
                task: task.name.clone(),
                error: err.to_string(),
            },
        }
    }

    /// Shutdown sequencer.
    ///
    /// Interrupts every live process not yet signalled, then keeps applying
    /// incoming events until each of them reported its exit or the shared
    /// deadline passes; whatever is still outstanding then gets killed.
    /// Dispatch errors don't stop the sequence; the first one is returned
    /// once it completed.
    async fn cleanup(&mut self) -> Result<()> {
        let mut outstanding: HashSet<TaskName> = HashSet::new();

        for (name, process) in self.live.iter_mut().filter(|(_, p)| !p.killed) {
            process.killed = true;
            if let Err(e) = process.handle.signal(ProcessSignal::Interrupt) {
                warn!(task = %name, error = %e, "failed to interrupt task process");
            }
            outstanding.insert(name.clone());
        }

        if outstanding.is_empty() {
            debug!("no live task processes to stop");
            return Ok(());
        }

        info!(
            count = outstanding.len(),
            timeout_ms = self.options.cleanup_timeout.as_millis() as u64,
            "interrupted live task processes; waiting for them to exit"
        );

        let now = Instant::now();
        let deadline = now
            .checked_add(self.options.cleanup_timeout)
            .unwrap_or_else(|| now + MAX_CLEANUP_WAIT);
        let mut first_error = None;

        while !outstanding.is_empty() {
            match timeout_at(deadline, self.event_rx.recv()).await {
                Ok(Some(event)) => {
                    if let RuntimeEvent::TaskExited { task, .. } = &event {
                        outstanding.remove(task);
                    }
                    if let Err(e) = self.dispatch(event) {
                        warn!(error = %e, "runtime step failed during shutdown");
                        first_error.get_or_insert(e);
                    }
                }
                Ok(None) => {
                    debug!("event channel closed during shutdown");
                    break;
                }
                Err(_elapsed) => {
                    warn!(remaining = ?outstanding, "cleanup timeout elapsed; killing remaining processes");
                    for name in outstanding.iter() {
                        if let Some(process) = self.live.get_mut(name) {
                            if let Err(e) = process.handle.signal(ProcessSignal::Kill) {
                                warn!(task = %name, error = %e, "failed to kill task process");
                            }
                        }
                    }
                    break;
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
