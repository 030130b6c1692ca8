//! File system utilities for dealgate
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{read_config, read_json, write_json};
pub use paths::{get_config_path, resolve_config_path, resolve_cwd, CONFIG_FILE_NAME};
