//! Fetch controller state for the posts panel.
//!
//! The host performs the HTTP request; this module only interprets the
//! response and tracks the per-activation state machine
//! `Idle → Loading → Success | Failure`.

use thiserror::Error;

use crate::domain::Post;

/// Message used when a failure carries no text of its own.
pub const FALLBACK_ERROR: &str = "Error fetching data";

/// Why a posts response was rejected.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source answered with a non-2xx status.
    #[error("Network response was not ok")]
    Status(u16),

    /// The body was not a JSON array of posts.
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

/// Lifecycle of one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No activation exists yet.
    #[default]
    Idle,
    /// Request issued, no response yet.
    Loading,
    /// Records in source order.
    Success(Vec<Post>),
    /// Human-readable failure message, never empty.
    Failure(String),
}

impl FetchState {
    /// Builds a failure state, substituting [`FALLBACK_ERROR`] for a blank message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Failure(FALLBACK_ERROR.to_string())
        } else {
            Self::Failure(message)
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Records when the fetch succeeded, an empty slice otherwise.
    #[must_use]
    pub fn records(&self) -> &[Post] {
        match self {
            Self::Success(posts) => posts,
            _ => &[],
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure(message) => Some(message),
            _ => None,
        }
    }
}

impl From<Result<Vec<Post>, FetchError>> for FetchState {
    fn from(result: Result<Vec<Post>, FetchError>) -> Self {
        match result {
            Ok(posts) => Self::Success(posts),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Interprets a completed HTTP response.
///
/// # Errors
///
/// Returns [`FetchError::Status`] for any status outside `200..300` and
/// [`FetchError::Parse`] when the body is not a JSON array of posts.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Vec<Post>, FetchError> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status(status));
    }
    Ok(serde_json::from_slice(body)?)
}
