// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, TaskRegistry};
use crate::config::validate::validate_config;
use crate::errors::{Result, TaskTuiError};

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "tasktui.config.json";

/// Load a configuration file and return the raw `ConfigFile`.
///
/// Files with a `.toml` extension are parsed as TOML, everything else as
/// JSON. This only performs deserialization; use [`load_registry`] for the
/// validated, engine-ready form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| TaskTuiError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config: ConfigFile = if is_toml {
        toml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };

    debug!(path = %path.display(), tasks = config.tasks.len(), "config file parsed");
    Ok(config)
}

/// Load, validate and resolve a config file into a [`TaskRegistry`].
///
/// `base_dir` is the directory relative task working directories are
/// resolved against (the directory tasktui was started from).
pub fn load_registry(path: impl AsRef<Path>, base_dir: &Path) -> Result<TaskRegistry> {
    let config = load_from_path(path)?;
    validate_config(&config)?;
    Ok(TaskRegistry::from_config(&config, base_dir))
}

/// Resolve the config path given on the command line against `base_dir`.
pub fn resolve_config_path(cli_path: Option<&Path>, base_dir: &Path) -> PathBuf {
    let path = cli_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
