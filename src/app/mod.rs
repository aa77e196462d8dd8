//! Application layer between the plugin shim and the domain, posts, tasks,
//! storage and UI layers.
//!
//! # Architecture
//!
//! ```text
//! Host Events → Event → handle_event → State Mutations → Actions → Host Calls
//!                   ↑                                          ↓
//!                   └──── web / timer / worker callbacks ──────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects for the shim to execute
//! - [`handler`]: Event processing
//! - [`modes`]: Input and view modes
//! - [`state`]: State container and view model computation
//! - [`timers`]: Identity of host timers

pub mod actions;
pub mod handler;
pub mod modes;
pub mod state;
pub mod timers;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use modes::{EditTarget, InputMode, ViewMode};
pub use state::{AppState, WebAccess};
pub use timers::TimerQueue;
