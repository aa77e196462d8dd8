//! Error types for the Taskboard plugin.
//!
//! [`TaskboardError`] covers everything that can fail inside the plugin and its
//! worker. Fetch failures of the posts panel have their own type in
//! [`crate::posts::fetch`] because they are rendered, not propagated.

use thiserror::Error;

/// The main error type for Taskboard plugin operations.
///
/// # Examples
///
/// ```
/// use taskboard::domain::TaskboardError;
///
/// let err = TaskboardError::Config("page_size must be a positive integer".to_string());
/// assert_eq!(err.to_string(), "Configuration error: page_size must be a positive integer");
/// ```
#[derive(Debug, Error)]
pub enum TaskboardError {
    /// Reading or writing the key-value storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A theme could not be read or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// A message to or from the background worker could not be handled.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for Taskboard operations.
pub type Result<T> = std::result::Result<T, TaskboardError>;
