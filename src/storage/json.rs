//! JSON file storage backend.
//!
//! All entries live in one document that is loaded on creation and rewritten
//! on every modification through a temporary file and a rename, so a crash
//! never leaves a half-written file behind.

use crate::domain::error::{Result, TaskboardError};
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current on-disk format version.
const FORMAT_VERSION: u32 = 1;

/// Top-level document written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// JSON document store.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "entries": {
///     "tasks": [{"id": 1700000000000, "text": "…", "completed": false, "createdAt": "…"}],
///     "theme": "dark"
///   }
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Opens the document at `file_path`, creating parent directories as needed.
    ///
    /// A missing file starts an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the file
    /// exists but is not a valid storage document.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        tracing::debug!(entries = data.entries.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| TaskboardError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > FORMAT_VERSION {
            tracing::warn!(
                version = data.version,
                supported = FORMAT_VERSION,
                "storage written by a newer version"
            );
        }

        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| TaskboardError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        let value = self.data.entries.get(key).cloned();
        tracing::debug!(key, found = value.is_some(), "storage read");
        Ok(value)
    }

    fn write(&mut self, key: &str, value: Value) -> Result<()> {
        let _span = tracing::debug_span!("json_write", key).entered();

        if self.data.entries.get(key) == Some(&value) {
            tracing::trace!("value unchanged");
            return Ok(());
        }

        self.data.entries.insert(key.to_string(), value);
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.write("theme", json!("light")).unwrap();
        storage.write("tasks", json!([{"id": 1}])).unwrap();
        drop(storage);

        let storage = JsonStorage::new(path).unwrap();
        assert_eq!(storage.read("theme").unwrap(), Some(json!("light")));
        assert_eq!(storage.read("tasks").unwrap(), Some(json!([{"id": 1}])));
        assert_eq!(storage.read("missing").unwrap(), None);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");

        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.write("k", json!(1)).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, json!({"version": 1, "entries": {"k": 1}}));
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonStorage::new(path).err().unwrap();
        assert!(matches!(err, TaskboardError::Storage(_)));
    }
}
