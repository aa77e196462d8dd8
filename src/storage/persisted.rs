//! Plugin-side persistence hook.
//!
//! [`Persisted`] holds a value that mirrors one storage key. It starts with an
//! initial value, asks the worker for the stored one, and turns every local
//! change into a write request. Storage problems never reach the caller: a
//! miss, an undecodable value or a worker error keeps the current value and is
//! logged.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::worker::{WorkerMessage, WorkerResponse};

/// Combines a stored value with local changes made before it arrived.
pub trait Merge {
    fn merge(loaded: Self, local: Self) -> Self;
}

/// A value mirrored to one storage key.
#[derive(Debug, Clone)]
pub struct Persisted<T> {
    key: &'static str,
    value: T,
    hydrated: bool,
    changed_before_hydration: bool,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned + Merge + Default,
{
    #[must_use]
    pub const fn new(key: &'static str, initial: T) -> Self {
        Self {
            key,
            value: initial,
            hydrated: false,
            changed_before_hydration: false,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub const fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Request for the stored value.
    #[must_use]
    pub fn read_request(&self) -> WorkerMessage {
        WorkerMessage::read(self.key.to_string())
    }

    /// Applies `change`; when it reports a modification, returns the write
    /// request for the new value.
    pub fn update(&mut self, change: impl FnOnce(&mut T) -> bool) -> Option<WorkerMessage> {
        if !change(&mut self.value) {
            return None;
        }
        if !self.hydrated {
            self.changed_before_hydration = true;
        }
        self.write_request()
    }

    /// Write request for the current value, `None` if it cannot be encoded.
    #[must_use]
    pub fn write_request(&self) -> Option<WorkerMessage> {
        match serde_json::to_value(&self.value) {
            Ok(value) => Some(WorkerMessage::write(self.key.to_string(), value)),
            Err(e) => {
                tracing::error!(key = self.key, error = %e, "Failed to encode persisted value");
                None
            }
        }
    }

    /// Consumes a worker response addressed to this key.
    ///
    /// Returns `None` when the response is for another key. Otherwise returns
    /// `Some(write)` where `write` is a follow-up write request needed after
    /// merging local changes into the hydrated value.
    pub fn on_response(&mut self, response: &WorkerResponse) -> Option<Option<WorkerMessage>> {
        if response.key() != self.key {
            return None;
        }

        let follow_up = match response {
            WorkerResponse::Value { value, .. } => self.hydrate(value.clone()),
            WorkerResponse::Written { .. } => {
                tracing::trace!(key = self.key, "Value persisted");
                None
            }
            WorkerResponse::Error { message, .. } => {
                tracing::error!(key = self.key, error = %message, "Storage operation failed");
                self.finish_hydration()
            }
        };
        Some(follow_up)
    }

    fn hydrate(&mut self, stored: Option<serde_json::Value>) -> Option<WorkerMessage> {
        if self.hydrated {
            return None;
        }

        let Some(stored) = stored else {
            tracing::debug!(key = self.key, "No stored value, keeping initial");
            return self.finish_hydration();
        };

        match serde_json::from_value::<T>(stored) {
            Ok(loaded) if self.changed_before_hydration => {
                let local = std::mem::take(&mut self.value);
                self.value = T::merge(loaded, local);
                tracing::debug!(key = self.key, "Merged stored value with local changes");
                self.hydrated = true;
                self.write_request()
            }
            Ok(loaded) => {
                self.value = loaded;
                self.hydrated = true;
                tracing::debug!(key = self.key, "Hydrated from storage");
                None
            }
            Err(e) => {
                tracing::error!(key = self.key, error = %e, "Stored value could not be decoded, keeping initial");
                self.finish_hydration()
            }
        }
    }

    fn finish_hydration(&mut self) -> Option<WorkerMessage> {
        if self.hydrated {
            return None;
        }
        self.hydrated = true;
        self.changed_before_hydration
            .then(|| self.write_request())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Words(Vec<String>);

    impl Merge for Words {
        fn merge(mut loaded: Self, local: Self) -> Self {
            loaded.0.extend(local.0);
            loaded
        }
    }

    fn value(key: &str, value: Option<serde_json::Value>) -> WorkerResponse {
        WorkerResponse::Value {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn hydrates_from_stored_value() {
        let mut words = Persisted::new("words", Words::default());
        assert_eq!(words.on_response(&value("words", Some(json!(["a"])))), Some(None));
        assert_eq!(words.get(), &Words(vec!["a".to_string()]));
        assert!(words.is_hydrated());
    }

    #[test]
    fn miss_and_bad_value_keep_initial() {
        let mut missing = Persisted::new("words", Words(vec!["init".to_string()]));
        missing.on_response(&value("words", None));
        assert_eq!(missing.get().0, vec!["init"]);

        let mut corrupt = Persisted::new("words", Words(vec!["init".to_string()]));
        corrupt.on_response(&value("words", Some(json!({"not": "a list"}))));
        assert_eq!(corrupt.get().0, vec!["init"]);
        assert!(corrupt.is_hydrated());
    }

    #[test]
    fn ignores_other_keys() {
        let mut words = Persisted::new("words", Words::default());
        assert_eq!(words.on_response(&value("theme", Some(json!("dark")))), None);
        assert!(!words.is_hydrated());
    }

    #[test]
    fn early_changes_are_merged_and_written_back() {
        let mut words = Persisted::new("words", Words::default());
        let write = words.update(|w| {
            w.0.push("local".to_string());
            true
        });
        assert!(matches!(write, Some(WorkerMessage::Write { .. })));

        let follow_up = words.on_response(&value("words", Some(json!(["stored"])))).unwrap();
        assert_eq!(words.get().0, vec!["stored", "local"]);
        match follow_up {
            Some(WorkerMessage::Write { key, value, .. }) => {
                assert_eq!(key, "words");
                assert_eq!(value, json!(["stored", "local"]));
            }
            other => panic!("expected write-back, got {other:?}"),
        }
    }

    #[test]
    fn unchanged_update_writes_nothing() {
        let mut words = Persisted::new("words", Words::default());
        assert!(words.update(|_| false).is_none());
    }

    #[test]
    fn late_value_after_hydration_is_ignored() {
        let mut words = Persisted::new("words", Words::default());
        words.on_response(&value("words", Some(json!(["first"]))));
        words.on_response(&value("words", Some(json!(["second"]))));
        assert_eq!(words.get().0, vec!["first"]);
    }
}
