// src/engine/gate.rs

use tracing::warn;

use crate::config::TaskRegistry;
use crate::engine::state::RunState;

/// Check that every declared dependency of `task` exists in `registry`.
///
/// On the first missing dependency the task is recorded as a finished,
/// errored entry (buffer + `task_order`) and `false` is returned; the task
/// must then be neither queued nor spawned. Returns `true` without touching
/// `state` when all dependencies exist.
pub fn ensure_dependencies(
    task: &str,
    deps: &[String],
    registry: &TaskRegistry,
    state: &mut RunState,
) -> bool {
    match deps.iter().find(|dep| !registry.contains(dep)) {
        Some(missing) => {
            warn!(task, dependency = %missing, "task depends on an unknown task");
            state.record_gate_failure(task, missing);
            false
        }
        None => true,
    }
}
