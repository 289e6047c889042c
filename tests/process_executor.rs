// tests/process_executor.rs
#![cfg(unix)]

mod common;
use crate::common::builders::task;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use tasktui::config::{TaskDefinition, TaskRegistry};
use tasktui::engine::{CoreRuntime, Observer, RunState, Runtime, RuntimeEvent, RuntimeOptions};
use tasktui::errors::TaskTuiError;
use tasktui::exec::{ExecutorBackend, ProcessExecutor};
use tasktui::types::TaskExit;

type TestResult = Result<(), Box<dyn Error>>;

/// Collect everything one task reports until its exit.
async fn collect_until_exit(rx: &mut mpsc::Receiver<RuntimeEvent>) -> (String, TaskExit) {
    let mut text = String::new();
    while let Some(event) = rx.recv().await {
        match event {
            RuntimeEvent::TaskOutput { text: chunk, .. } => text.push_str(&chunk),
            RuntimeEvent::TaskExited { exit, .. } => return (text, exit),
            other => panic!("unexpected event {other:?}"),
        }
    }
    panic!("channel closed before the task exited");
}

#[tokio::test]
async fn stdout_and_stderr_end_up_in_one_stream_before_the_exit() -> TestResult {
    init_tracing();

    let (tx, mut rx) = mpsc::channel(64);
    let mut executor = ProcessExecutor::new(tx);

    let _handle = executor.launch(&task(
        "mixed",
        "echo to-stdout; echo to-stderr 1>&2; exit 3",
        &[],
    ))?;

    let (text, exit) = with_timeout(collect_until_exit(&mut rx)).await;

    assert!(text.contains("to-stdout\n"), "{text:?}");
    assert!(text.contains("to-stderr\n"), "{text:?}");
    assert_eq!(exit.code, Some(3));
    assert!(!exit.success());

    Ok(())
}

#[tokio::test]
async fn tasks_run_in_their_working_directory_with_colour_forced() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let (tx, mut rx) = mpsc::channel(64);
    let mut executor = ProcessExecutor::new(tx);

    let def = TaskDefinition {
        name: "env".to_string(),
        command: "pwd; echo \"$FORCE_COLOR\"".to_string(),
        working_directory: dir.path().to_path_buf(),
        depends_on: vec![],
    };
    let _handle = executor.launch(&def)?;

    let (text, exit) = with_timeout(collect_until_exit(&mut rx)).await;

    let expected_dir = dir.path().canonicalize()?;
    let mut lines = text.lines();
    let reported_dir = PathBuf::from(lines.next().unwrap_or_default()).canonicalize()?;
    assert_eq!(reported_dir, expected_dir);
    assert_eq!(lines.next(), Some("1"));
    assert!(exit.success());

    Ok(())
}

#[tokio::test]
async fn missing_working_directory_is_a_spawn_error() {
    init_tracing();

    let (tx, _rx) = mpsc::channel(8);
    let mut executor = ProcessExecutor::new(tx);

    let def = TaskDefinition {
        name: "nowhere".to_string(),
        command: "true".to_string(),
        working_directory: PathBuf::from("/definitely/not/a/real/dir"),
        depends_on: vec![],
    };

    match executor.launch(&def) {
        Err(TaskTuiError::SpawnError { task, .. }) => assert_eq!(task, "nowhere"),
        Err(e) => panic!("Expected SpawnError, got: {e:?}"),
        Ok(_) => panic!("Expected spawn to fail"),
    }
}

/// Observer that requests quit once `condition` holds for a rendered state.
struct QuitWhen<F: FnMut(&RunState) -> bool + Send> {
    tx: mpsc::Sender<RuntimeEvent>,
    condition: F,
    sent: bool,
}

impl<F: FnMut(&RunState) -> bool + Send> Observer for QuitWhen<F> {
    fn render(&mut self, state: &RunState) -> tasktui::errors::Result<()> {
        if !self.sent && (self.condition)(state) {
            self.sent = true;
            let _ = self.tx.try_send(RuntimeEvent::QuitRequested);
        }
        Ok(())
    }

    fn report_error(&mut self, _message: &str) {}
}

async fn run_registry<F>(registry: TaskRegistry, cleanup_timeout: Duration, condition: F) -> RunState
where
    F: FnMut(&RunState) -> bool + Send,
{
    let (tx, rx) = mpsc::channel(256);
    tx.send(RuntimeEvent::ConfigLoaded(registry))
        .await
        .expect("runtime channel open");

    let observer = QuitWhen {
        tx: tx.clone(),
        condition,
        sent: false,
    };
    let runtime = Runtime::new(
        CoreRuntime::new(),
        rx,
        ProcessExecutor::new(tx),
        observer,
        RuntimeOptions { cleanup_timeout },
    );

    let runtime = with_timeout(runtime.run()).await.expect("runtime succeeded");
    runtime.core().state().clone()
}

#[tokio::test]
async fn dependent_starts_after_its_dependency_exits() {
    init_tracing();

    let registry = TaskRegistry::from_definitions([
        task("first", "printf first", &[]),
        task("second", "printf second", &["first"]),
    ]);

    let state = run_registry(registry, Duration::from_secs(1), |state| {
        state.buffer("second").is_some_and(|b| b.exit.is_some())
    })
    .await;

    assert_eq!(state.task_order(), ["first".to_string(), "second".to_string()]);
    assert_eq!(state.buffer("first").map(|b| b.text.as_str()), Some("first"));
    assert_eq!(state.buffer("second").map(|b| b.text.as_str()), Some("second"));
    assert!(state.buffer("second").is_some_and(|b| !b.errored));
}

#[tokio::test]
async fn quit_interrupts_long_running_tasks() {
    init_tracing();

    let registry = TaskRegistry::from_definitions([task("sleeper", "sleep 30", &[])]);

    let state = run_registry(registry, Duration::from_secs(1), |state| {
        state.buffer("sleeper").is_some_and(|b| b.running)
    })
    .await;

    let sleeper = state.buffer("sleeper").expect("sleeper was started");
    assert!(!sleeper.running);
    assert!(sleeper.errored);
    assert!(sleeper.exit.is_some_and(|exit| !exit.success()));
}

#[test]
fn signalling_a_vanished_process_group_is_not_an_error() {
    use tasktui::exec::signal::signal_process_group;
    use tasktui::types::ProcessSignal;

    // No process group has this id; killpg reports ESRCH.
    let gone = i32::MAX as u32;
    assert!(signal_process_group(gone, ProcessSignal::Interrupt).is_ok());
    assert!(signal_process_group(gone, ProcessSignal::Kill).is_ok());

    let err = signal_process_group(u32::MAX, ProcessSignal::Kill)
        .expect_err("pid beyond pid_t range");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}
