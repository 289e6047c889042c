// src/config/mod.rs

//! Configuration loading and validation for tasktui.
//!
//! Responsibilities:
//! - Define the serde-backed data model and the engine-facing registry
//!   (`model.rs`).
//! - Load a JSON or TOML config file from disk (`loader.rs`).
//! - Reject malformed configs and detect dependency cycles (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_PATH, load_from_path, load_registry, resolve_config_path};
pub use model::{ConfigFile, TaskConfig, TaskDefinition, TaskRegistry};
pub use validate::{find_dependency_cycle, validate_config};
