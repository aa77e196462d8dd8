//! Storage layer.
//!
//! The worker side persists a string-keyed JSON document; the plugin side
//! mirrors individual keys through [`Persisted`] values that talk to the
//! worker with [`crate::worker::WorkerMessage`]s.
//!
//! # Modules
//!
//! - `backend`: Key-value trait implemented by storage backends
//! - `json`: JSON document backend with atomic writes
//! - `persisted`: Plugin-side read/write hook for one key

pub mod backend;
pub mod json;
pub mod persisted;

pub use backend::Storage;
pub use json::JsonStorage;
pub use persisted::{Merge, Persisted};

/// Storage key of the task list.
pub const TASKS_KEY: &str = "tasks";

/// Storage key of the theme choice.
pub const THEME_KEY: &str = "theme";
