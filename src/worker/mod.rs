//! Background worker for storage I/O.
//!
//! All reads and writes of the key-value document run on a Zellij worker
//! thread so the plugin's render loop never blocks on the filesystem.
//!
//! - `messages`: Request/response protocol with trace context propagation
//! - `handler`: Request handling over a [`crate::storage::Storage`] backend

pub mod handler;
pub mod messages;

pub use handler::TaskboardWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};

/// Name under which the worker is registered and addressed.
pub const WORKER_NAME: &str = "taskboard";
