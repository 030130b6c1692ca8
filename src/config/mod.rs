//! Configuration loading

mod loader;

pub use loader::{
    build_checker, load_config, load_required_config, load_run_config, validate_config,
    SUPPORTED_SCHEMA_VERSION,
};
