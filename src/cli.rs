// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

/// Largest accepted `--cleanup-timeout`, one hour.
pub const MAX_CLEANUP_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Command-line arguments for `tasktui`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tasktui",
    version,
    about = "Run a set of dependent shell tasks and browse their output in the terminal.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (JSON, or TOML with a `.toml` extension).
    ///
    /// Default: `tasktui.config.json` in the current working directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Reload the config when it changes on disk. Newly added tasks are
    /// started; tasks that already ran are left alone.
    #[arg(long)]
    pub watch: bool,

    /// How long to wait for interrupted tasks to exit on quit before they
    /// are killed, in milliseconds (at most one hour).
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 10_000,
        value_parser = clap::value_parser!(u64).range(..=MAX_CLEANUP_TIMEOUT_MS)
    )]
    pub cleanup_timeout: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKTUI_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Write logs to this file. The terminal belongs to the task view, so
    /// without a file logs only go to stderr when a level was asked for.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Parse + validate, print the tasks and their dependencies, but don't
    /// run any commands.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    pub fn cleanup_timeout(&self) -> Duration {
        Duration::from_millis(self.cleanup_timeout)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
