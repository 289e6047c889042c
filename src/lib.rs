// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod tui;
pub mod types;
pub mod watch;

use std::path::Path;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{TaskRegistry, find_dependency_cycle, load_registry, resolve_config_path};
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use crate::exec::ProcessExecutor;
use crate::tui::{TerminalObserver, spawn_input_listener};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (and optional reloading)
/// - the core runtime and its IO shell
/// - the process executor
/// - the terminal observer and keyboard input
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let base_dir = std::env::current_dir().context("failed to determine current directory")?;
    let config_path = resolve_config_path(args.config.as_deref(), &base_dir);

    if args.dry_run {
        let registry = load_registry(&config_path, &base_dir).with_context(|| {
            format!("failed to load config from {}", config_path.display())
        })?;
        print_dry_run(&config_path, &registry);
        return Ok(());
    }

    let initial = initial_event(&config_path, &base_dir);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(256);
    rt_tx.send(initial).await?;

    let executor = ProcessExecutor::new(rt_tx.clone());

    let _watcher_handle = if args.watch {
        Some(crate::watch::spawn_config_watcher(
            &config_path,
            &base_dir,
            rt_tx.clone(),
        )?)
    } else {
        None
    };

    // Ctrl-C delivered as a signal (e.g. from outside the terminal).
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            let _ = tx.send(RuntimeEvent::QuitRequested).await;
        });
    }

    let observer = TerminalObserver::new().context("failed to set up terminal")?;
    let input = spawn_input_listener(rt_tx.clone());
    drop(rt_tx);

    let options = RuntimeOptions {
        cleanup_timeout: args.cleanup_timeout(),
    };
    info!(config = %config_path.display(), ?options, "starting tasktui");

    let runtime = Runtime::new(CoreRuntime::new(), rt_rx, executor, observer, options);
    let result = runtime.run().await;
    input.abort();

    // Dropping the runtime (and its observer) restores the terminal.
    drop(result?);
    Ok(())
}

/// First event for the runtime: the loaded registry, or the load error.
///
/// A broken config is not fatal. The error shows up in the view, and with
/// `--watch` the next valid save starts the run.
pub fn initial_event(config_path: &Path, base_dir: &Path) -> RuntimeEvent {
    match load_registry(config_path, base_dir) {
        Ok(registry) => RuntimeEvent::ConfigLoaded(registry),
        Err(err) => {
            warn!(config = %config_path.display(), error = %err, "initial config load failed");
            RuntimeEvent::ConfigFailed(err.to_string())
        }
    }
}

/// Simple dry-run output: print tasks, commands and dependencies.
fn print_dry_run(config_path: &Path, registry: &TaskRegistry) {
    println!("tasktui dry-run");
    println!("  config = {}", config_path.display());
    println!();

    println!("tasks ({}):", registry.len());
    for task in registry.iter() {
        println!("  - {}", task.name);
        println!("      cmd: {}", task.command);
        println!("      cwd: {}", task.working_directory.display());
        if !task.depends_on.is_empty() {
            println!("      depends_on: {:?}", task.depends_on);
        }
        let missing: Vec<&str> = task
            .depends_on
            .iter()
            .map(String::as_str)
            .filter(|dep| !registry.contains(dep))
            .collect();
        if !missing.is_empty() {
            println!("      missing: {missing:?}");
        }
    }

    if let Some(task) = find_dependency_cycle(registry) {
        println!();
        println!("warning: dependency cycle through task '{task}'");
    }

    debug!("dry-run complete (no execution)");
}
