//! Domain layer for the Taskboard plugin.
//!
//! Core types independent of Zellij APIs and storage details.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`post`]: Record shape of the remote post list
//! - [`task`]: Task model and task filters
//!
//! # Examples
//!
//! ```
//! use taskboard::domain::{Post, Result};
//!
//! fn first_post() -> Result<Post> {
//!     Ok(Post::new(1, "hello", "world"))
//! }
//! ```

pub mod error;
pub mod post;
pub mod task;

pub use error::{Result, TaskboardError};
pub use post::Post;
pub use task::{Task, TaskFilter};
