//! JSON file operations with schema validation
//!
//! Provides functions to read and write JSON files with serde validation.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{DealgateError, Result};
use crate::schemas::Config;

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or does not match the expected schema
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DealgateError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            DealgateError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        DealgateError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| DealgateError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read a config file, falling back to defaults when it does not exist.
pub fn read_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{NegotiationContext, NegotiationState};
    use tempfile::TempDir;

    #[test]
    fn test_read_json_file_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.json");

        let result: Result<NegotiationContext> = read_json(&path);
        assert!(matches!(result.unwrap_err(), DealgateError::FileNotFound(_)));
    }

    #[test]
    fn test_read_json_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("invalid.json");
        fs::write(&path, "not valid json {").unwrap();

        let result: Result<NegotiationContext> = read_json(&path);
        assert!(matches!(result.unwrap_err(), DealgateError::InvalidJson(_)));
    }

    #[test]
    fn test_read_json_unknown_state() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ctx.json");
        fs::write(
            &path,
            r#"{"negotiation_id": "X", "state": "DONE", "updated_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let result: Result<NegotiationContext> = read_json(&path);
        assert!(matches!(result.unwrap_err(), DealgateError::InvalidJson(_)));
    }

    #[test]
    fn test_write_and_read_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("negotiation.json");

        let ctx = NegotiationContext::new("SIM-009")
            .with_state(NegotiationState::Stalled)
            .with_round(3);

        write_json(&path, &ctx).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let read: NegotiationContext = read_json(&path).unwrap();
        assert_eq!(read, ctx);
    }

    #[test]
    fn test_read_config_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = read_config(&temp.path().join("dealgate.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
