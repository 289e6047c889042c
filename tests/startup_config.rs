// tests/startup_config.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::time::Duration;

use tokio::sync::mpsc;

use tasktui::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use tasktui::initial_event;
use tasktui_test_utils::fake_executor::FakeExecutor;
use tasktui_test_utils::observer::RecordingObserver;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn malformed_config_at_startup_is_shown_not_fatal() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tasktui.config.json");
    std::fs::write(&path, r#"{ "tasks": { "build": { "command": "#)?;

    let initial = initial_event(&path, dir.path());
    assert!(
        matches!(&initial, RuntimeEvent::ConfigFailed(_)),
        "expected a load failure, got {initial:?}"
    );

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let executor = FakeExecutor::new(rt_tx.clone());
    let launched = executor.launched();

    rt_tx.send(initial).await?;
    rt_tx.send(RuntimeEvent::QuitRequested).await?;

    let runtime = Runtime::new(
        CoreRuntime::new(),
        rt_rx,
        executor,
        RecordingObserver::new(),
        RuntimeOptions {
            cleanup_timeout: Duration::from_secs(1),
        },
    );
    let runtime = with_timeout(runtime.run()).await?;

    assert!(launched.lock().unwrap().is_empty());
    assert_eq!(runtime.observer().errors.len(), 1);

    let state = runtime.core().state();
    assert!(state.last_error().is_some());
    assert!(state.task_order().is_empty());

    Ok(())
}

#[tokio::test]
async fn missing_config_at_startup_is_reported_as_a_load_failure() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    match initial_event(&path, dir.path()) {
        RuntimeEvent::ConfigFailed(message) => assert!(!message.is_empty()),
        other => panic!("Expected ConfigFailed, got: {other:?}"),
    }
}

#[test]
fn valid_config_at_startup_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasktui.config.json");
    std::fs::write(&path, r#"{ "tasks": { "build": { "command": "make" } } }"#).unwrap();

    match initial_event(&path, dir.path()) {
        RuntimeEvent::ConfigLoaded(registry) => {
            assert_eq!(registry.names().collect::<Vec<_>>(), vec!["build"]);
        }
        other => panic!("Expected ConfigLoaded, got: {other:?}"),
    }
}
