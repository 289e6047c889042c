// src/watch/mod.rs

//! Config file watching.
//!
//! Turns changes to the config file into fresh `ConfigLoaded` events (or
//! `ConfigFailed` when the new contents don't parse). The engine itself
//! decides what a reload means: already-dispatched tasks are never started
//! again, and an emptied config shuts the run down.

pub mod watcher;

pub use watcher::{WatcherHandle, spawn_config_watcher};
