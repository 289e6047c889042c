#![allow(dead_code)]

use std::collections::VecDeque;

pub use tasktui_test_utils::builders;
pub use tasktui_test_utils::{init_tracing, with_timeout};

use tasktui::engine::{CoreCommand, CoreRuntime, CoreStep, RuntimeEvent};
use tasktui::types::TaskExit;

/// Names of the tasks a step asked to spawn, in order.
pub fn spawns(step: &CoreStep) -> Vec<String> {
    step.commands
        .iter()
        .filter_map(|cmd| match cmd {
            CoreCommand::Spawn(task) => Some(task.name.clone()),
            _ => None,
        })
        .collect()
}

/// Step the core the way the runtime shell does: every spawn command is
/// answered with a successful `TaskSpawned`. Returns all spawned names.
pub fn apply(core: &mut CoreRuntime, event: RuntimeEvent) -> Vec<String> {
    let mut spawned = Vec::new();
    let mut pending = VecDeque::from([event]);

    while let Some(event) = pending.pop_front() {
        let step = core.step(event);
        for name in spawns(&step) {
            pending.push_back(RuntimeEvent::TaskSpawned { task: name.clone() });
            spawned.push(name);
        }
    }

    spawned
}

pub fn exited(task: &str, code: i32) -> RuntimeEvent {
    RuntimeEvent::TaskExited {
        task: task.to_string(),
        exit: TaskExit::with_code(code),
    }
}

pub fn output(task: &str, text: &str) -> RuntimeEvent {
    RuntimeEvent::TaskOutput {
        task: task.to_string(),
        text: text.to_string(),
    }
}
