//! Configuration loading with defaults

use std::path::Path;

use crate::domain::InvariantChecker;
use crate::errors::{DealgateError, Result};
use crate::fs;
use crate::schemas::Config;

/// Highest config schema version this build understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Load configuration from `path`, falling back to defaults.
///
/// A missing file yields the default configuration. Unspecified fields take
/// their defaults.
///
/// # Errors
/// * `InvalidJson` - If the file is not a valid config document
/// * `ConfigError` - If the config is from a newer schema or names an empty field
pub fn load_config(path: &Path) -> Result<Config> {
    let config = fs::read_config(path)?;
    accept(path, config)
}

/// Load configuration from a file that must exist.
///
/// # Errors
/// * `FileNotFound` - If there is no file at `path`
/// * `InvalidJson` / `ConfigError` - As for [`load_config`]
pub fn load_required_config(path: &Path) -> Result<Config> {
    let config = fs::read_json(path)?;
    accept(path, config)
}

/// Load the configuration for a run rooted at `cwd`.
///
/// A file named explicitly must exist. Without one, `dealgate.json` under
/// `cwd` is read when present and the defaults apply otherwise.
pub fn load_run_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let path = fs::resolve_config_path(explicit, cwd);
    match explicit {
        Some(_) => load_required_config(&path),
        None => load_config(&path),
    }
}

fn accept(path: &Path, config: Config) -> Result<Config> {
    validate_config(&config)?;
    tracing::debug!(
        path = %path.display(),
        rules = config.concession_rules.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Reject configurations the kernel cannot honor.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.schema_version > SUPPORTED_SCHEMA_VERSION {
        return Err(DealgateError::ConfigError(format!(
            "Unsupported schema_version {} (max {})",
            config.schema_version, SUPPORTED_SCHEMA_VERSION
        )));
    }
    if let Some(index) = config
        .concession_rules
        .iter()
        .position(|rule| rule.field.trim().is_empty())
    {
        return Err(DealgateError::ConfigError(format!(
            "concession_rules[{}] has an empty field name",
            index
        )));
    }
    Ok(())
}

/// Build the invariant checker described by `config`.
pub fn build_checker(config: &Config) -> InvariantChecker {
    InvariantChecker::from_config(config)
}
