use std::collections::HashSet;
use std::io;
use std::sync::{Arc, Mutex};

use tasktui::config::TaskDefinition;
use tasktui::engine::RuntimeEvent;
use tasktui::errors::{Result, TaskTuiError};
use tasktui::exec::{ExecutorBackend, ProcessHandle};
use tasktui::types::{ProcessSignal, TaskExit};

pub type SignalLog = Arc<Mutex<Vec<(String, ProcessSignal)>>>;

/// A fake executor that:
/// - records which tasks were launched, in order
/// - fails to launch the tasks listed in `failing`
/// - hands out [`FakeProcess`] handles recording every signal they receive.
///
/// Nothing runs: tests inject `TaskOutput` / `TaskExited` events themselves,
/// or let processes exit on interrupt via [`FakeExecutor::exit_on_interrupt`].
pub struct FakeExecutor {
    runtime_tx: tokio::sync::mpsc::Sender<RuntimeEvent>,
    launched: Arc<Mutex<Vec<String>>>,
    signals: SignalLog,
    failing: HashSet<String>,
    stubborn: HashSet<String>,
    exit_on_interrupt: bool,
    next_pid: u32,
}

impl FakeExecutor {
    pub fn new(runtime_tx: tokio::sync::mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            runtime_tx,
            launched: Arc::new(Mutex::new(Vec::new())),
            signals: Arc::new(Mutex::new(Vec::new())),
            failing: HashSet::new(),
            stubborn: HashSet::new(),
            exit_on_interrupt: false,
            next_pid: 1000,
        }
    }

    /// Launching `task` returns a spawn error.
    pub fn failing(mut self, task: &str) -> Self {
        self.failing.insert(task.to_string());
        self
    }

    /// Processes report an exit (code 130) as soon as they are interrupted.
    pub fn exit_on_interrupt(mut self) -> Self {
        self.exit_on_interrupt = true;
        self
    }

    /// `task` ignores interrupts even with `exit_on_interrupt`; only a kill
    /// would end it.
    pub fn stubborn(mut self, task: &str) -> Self {
        self.stubborn.insert(task.to_string());
        self
    }

    pub fn launched(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.launched)
    }

    pub fn signals(&self) -> SignalLog {
        Arc::clone(&self.signals)
    }
}

impl ExecutorBackend for FakeExecutor {
    fn launch(&mut self, task: &TaskDefinition) -> Result<Box<dyn ProcessHandle>> {
        if self.failing.contains(&task.name) {
            return Err(TaskTuiError::SpawnError {
                task: task.name.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such command"),
            });
        }

        self.launched.lock().unwrap().push(task.name.clone());
        self.next_pid += 1;

        Ok(Box::new(FakeProcess {
            task: task.name.clone(),
            pid: self.next_pid,
            signals: Arc::clone(&self.signals),
            runtime_tx: self.runtime_tx.clone(),
            exit_on_interrupt: self.exit_on_interrupt && !self.stubborn.contains(&task.name),
        }))
    }
}

/// Handle returned by [`FakeExecutor`].
pub struct FakeProcess {
    task: String,
    pid: u32,
    signals: SignalLog,
    runtime_tx: tokio::sync::mpsc::Sender<RuntimeEvent>,
    exit_on_interrupt: bool,
}

impl ProcessHandle for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    fn signal(&mut self, signal: ProcessSignal) -> io::Result<()> {
        self.signals
            .lock()
            .unwrap()
            .push((self.task.clone(), signal));

        if signal == ProcessSignal::Interrupt && self.exit_on_interrupt {
            let _ = self.runtime_tx.try_send(RuntimeEvent::TaskExited {
                task: self.task.clone(),
                exit: TaskExit::with_code(130),
            });
        }
        Ok(())
    }
}
