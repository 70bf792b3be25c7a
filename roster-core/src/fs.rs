//! File helpers shared by the file-backed stores.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{RosterError, RosterResult};

/// Read a JSON document, or the default value when the file does not exist yet.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> RosterResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| RosterError::Serialization(format!("{}: {e}", path.display())))
}

/// Write a JSON document through a temp file so readers never see half a file.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> RosterResult<()> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| RosterError::Serialization(e.to_string()))?;
    write_atomic(path, &content)
}

pub fn write_atomic(path: &Path, content: &str) -> RosterResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, path)?;
    Ok(())
}
