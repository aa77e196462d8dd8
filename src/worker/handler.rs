//! Worker-side request handling.
//!
//! [`TaskboardWorker`] owns the storage backend and answers one
//! [`WorkerMessage`] with one [`WorkerResponse`]. It has no Zellij
//! dependencies; the plugin binary wraps it in the `ZellijWorker` shim.

use crate::domain::error::{Result, TaskboardError};
use crate::infrastructure::paths;
use crate::storage::{JsonStorage, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};

/// Worker state. Storage is opened lazily on the first request.
#[derive(Serialize, Deserialize, Default)]
pub struct TaskboardWorker {
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl std::fmt::Debug for TaskboardWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskboardWorker")
            .field("storage_open", &self.storage.is_some())
            .finish()
    }
}

impl TaskboardWorker {
    /// Worker backed by an already opened store.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    /// Returns the store, opening `<data dir>/state.json` on first use.
    fn storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        if self.storage.is_none() {
            let path = paths::get_data_dir().join(paths::STATE_FILE);
            let storage: Box<dyn Storage> = Box::new(JsonStorage::new(path)?);
            self.storage = Some(storage);
        }

        self.storage
            .as_mut()
            .ok_or_else(|| TaskboardError::Worker("Storage not initialized".to_string()))
    }

    /// Logs the outcome of a storage call and turns failures into
    /// [`WorkerResponse::Error`] for `key`.
    fn handle_db_result<T, F>(operation: &str, key: String, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(String, T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, key = %key, "storage operation successful");
                on_success(key, value)
            }
            Err(e) => {
                tracing::error!(operation = operation, key = %key, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    key,
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Links spans created while handling `message` to the plugin span that
    /// sent it. The guard must outlive the handling.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Serves one request.
    ///
    /// ```rust
    /// use taskboard::storage::JsonStorage;
    /// use taskboard::worker::{TaskboardWorker, WorkerMessage, WorkerResponse};
    ///
    /// let dir = tempfile::tempdir()?;
    /// let storage = JsonStorage::new(dir.path().join("state.json"))?;
    /// let mut worker = TaskboardWorker::with_storage(Box::new(storage));
    ///
    /// let response = worker.handle_message(WorkerMessage::read("tasks".to_string()));
    /// assert_eq!(response, WorkerResponse::Value { key: "tasks".to_string(), value: None });
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", key = %message.key());
        let _guard = span.entered();

        match message {
            WorkerMessage::Read { key, .. } => {
                let result = self.storage().and_then(|storage| storage.read(&key));
                Self::handle_db_result("read", key, result, |key, value| WorkerResponse::Value { key, value })
            }
            WorkerMessage::Write { key, value, .. } => {
                let result = self.storage().and_then(|storage| storage.write(&key, value));
                Self::handle_db_result("write", key, result, |key, ()| WorkerResponse::Written { key })
            }
        }
    }

    /// Decodes a JSON request, serves it and encodes the reply.
    ///
    /// Returns `None` when the payload is not a [`WorkerMessage`] or the reply
    /// cannot be encoded; both are logged.
    pub fn on_payload(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        serde_json::to_string(&response)
            .map_err(|e| tracing::debug!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<Value>> {
            Err(TaskboardError::Storage("disk on fire".to_string()))
        }

        fn write(&mut self, _key: &str, _value: Value) -> Result<()> {
            Err(TaskboardError::Storage("read-only".to_string()))
        }
    }

    fn json_worker(dir: &TempDir) -> TaskboardWorker {
        let storage = JsonStorage::new(dir.path().join("state.json")).unwrap();
        TaskboardWorker::with_storage(Box::new(storage))
    }

    #[test]
    fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let mut worker = json_worker(&dir);

        let written = worker.handle_message(WorkerMessage::write("theme".to_string(), json!("light")));
        assert_eq!(written, WorkerResponse::Written { key: "theme".to_string() });

        let read = worker.handle_message(WorkerMessage::read("theme".to_string()));
        assert_eq!(
            read,
            WorkerResponse::Value {
                key: "theme".to_string(),
                value: Some(json!("light"))
            }
        );
    }

    #[test]
    fn values_survive_a_new_worker() {
        let dir = TempDir::new().unwrap();
        {
            let mut worker = json_worker(&dir);
            worker.handle_message(WorkerMessage::write("tasks".to_string(), json!([])));
        }

        let mut worker = json_worker(&dir);
        let read = worker.handle_message(WorkerMessage::read("tasks".to_string()));
        assert_eq!(
            read,
            WorkerResponse::Value {
                key: "tasks".to_string(),
                value: Some(json!([]))
            }
        );
    }

    #[test]
    fn storage_failures_become_error_responses() {
        let mut worker = TaskboardWorker::with_storage(Box::new(BrokenStorage));

        let read = worker.handle_message(WorkerMessage::read("tasks".to_string()));
        let WorkerResponse::Error { key, message } = read else {
            panic!("expected error, got {read:?}");
        };
        assert_eq!(key, "tasks");
        assert!(message.starts_with("read: "));
        assert!(message.contains("disk on fire"));

        let write = worker.handle_message(WorkerMessage::write("theme".to_string(), json!("dark")));
        assert_eq!(write.key(), "theme");
        assert!(matches!(write, WorkerResponse::Error { .. }));
    }

    #[test]
    fn payload_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut worker = json_worker(&dir);

        let reply = worker.on_payload(r#"{"Read": {"key": "missing"}}"#).unwrap();
        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert_eq!(
            response,
            WorkerResponse::Value {
                key: "missing".to_string(),
                value: None
            }
        );
    }

    #[test]
    fn garbage_payload_is_dropped() {
        let dir = TempDir::new().unwrap();
        let mut worker = json_worker(&dir);
        assert!(worker.on_payload("not json").is_none());
        assert!(worker.on_payload(r#"{"Delete": {"key": "x"}}"#).is_none());
    }

    #[test]
    fn malformed_trace_context_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut worker = json_worker(&dir);
        let payload = r#"{"Read": {"key": "theme", "trace_context": {"trace_id": "zz", "parent_span_id": "zz"}}}"#;
        assert!(worker.on_payload(payload).is_some());
    }
}
