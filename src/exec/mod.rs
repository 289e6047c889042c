// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the task commands, using
//! `tokio::process::Command`, and reporting back to the orchestration
//! runtime via `RuntimeEvent`s.
//!
//! - [`backend`] provides the `ExecutorBackend` / `ProcessHandle` traits and
//!   the `ProcessExecutor` the runtime uses in production, and which tests
//!   can replace with a fake implementation.
//! - [`task_runner`] supervises one child: output forwarding and exit.
//! - [`decode`] turns raw output chunks into text.
//! - [`signal`] delivers signals to process groups (Unix).

pub mod backend;
pub mod decode;
#[cfg(unix)]
pub mod signal;
pub mod task_runner;

pub use backend::{COLOR_ENV, ExecutorBackend, ProcessExecutor, ProcessHandle};
pub use decode::ChunkDecoder;
