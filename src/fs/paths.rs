//! Path resolution utilities for dealgate

use std::path::{Path, PathBuf};

/// File name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "dealgate.json";

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Get the path to the default config file under `root`.
pub fn get_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Pick the config file: an explicit path wins, otherwise `dealgate.json` in `cwd`.
pub fn resolve_config_path(explicit: Option<&Path>, cwd: &Path) -> PathBuf {
    match explicit {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => get_config_path(cwd),
    }
}
