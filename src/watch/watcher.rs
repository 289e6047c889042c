// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::load_registry;
use crate::engine::RuntimeEvent;

/// Handle for the config watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `config_path` and send a reloaded registry to the runtime whenever
/// the file changes.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by renaming a temp file over the config are picked up too.
pub fn spawn_config_watcher(
    config_path: impl Into<PathBuf>,
    base_dir: impl Into<PathBuf>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let config_path = config_path.into();
    let base_dir = base_dir.into();

    let watch_dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => base_dir.clone(),
    };
    let file_name = config_path
        .file_name()
        .map(|name| name.to_os_string())
        .with_context(|| format!("config path {} has no file name", config_path.display()))?;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    warn!(error = %err, "failed to forward notify event");
                }
            }
            Err(err) => {
                warn!(error = %err, "config watch error");
            }
        },
        Config::default(),
    )?;

    watcher
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_dir.display()))?;

    info!(path = %config_path.display(), "config watcher started");

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !is_content_change(&event.kind) {
                continue;
            }
            if !event.paths.iter().any(|p| p.file_name() == Some(file_name.as_os_str())) {
                continue;
            }
            debug!(?event, "config file changed");

            let reloaded = reload(&config_path, &base_dir);
            if runtime_tx.send(reloaded).await.is_err() {
                break;
            }
        }
        debug!("config watcher loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any
    )
}

fn reload(config_path: &Path, base_dir: &Path) -> RuntimeEvent {
    match load_registry(config_path, base_dir) {
        Ok(registry) => {
            info!(tasks = registry.len(), "config reloaded");
            RuntimeEvent::ConfigLoaded(registry)
        }
        Err(err) => {
            warn!(error = %err, "config reload failed");
            RuntimeEvent::ConfigFailed(err.to_string())
        }
    }
}
