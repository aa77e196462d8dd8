//! Key-value storage abstraction used by the worker.

use crate::domain::error::Result;
use serde_json::Value;

/// Persistent string-keyed JSON store.
///
/// The worker owns exactly one implementation and serves plugin reads and
/// writes from it.
///
/// # Implementations
///
/// - [`crate::storage::JsonStorage`]: single JSON document with atomic writes
///
/// # Examples
///
/// ```no_run
/// use taskboard::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/state.json"))?;
/// storage.write("theme", serde_json::json!("dark"))?;
/// assert_eq!(storage.read("theme")?, Some(serde_json::json!("dark")));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the value stored under `key`, `Ok(None)` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value, and persists it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn write(&mut self, key: &str, value: Value) -> Result<()>;
}
