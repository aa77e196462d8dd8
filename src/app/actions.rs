//! Side effects requested by the event handler.
//!
//! The handler never calls host APIs. It returns a list of [`Action`]s that the
//! plugin shim executes in order after each event.
//!
//! # Example
//!
//! ```rust
//! use taskboard::app::Action;
//! use taskboard::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::read("tasks".to_string()))];
//! assert_eq!(actions.len(), 1);
//! ```

use std::time::Duration;

use crate::posts::{ActivationId, TimerId};
use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Sends a storage request to the worker.
    PostToWorker(WorkerMessage),

    /// Issues the `GET` for a freshly mounted posts panel.
    ///
    /// The shim must hand `activation` back with the response so late results
    /// of a torn down panel can be recognised.
    FetchPosts {
        url: String,
        activation: ActivationId,
    },

    /// Schedules a debounce timer.
    ScheduleTimer {
        timer: TimerId,
        after: Duration,
    },
}
