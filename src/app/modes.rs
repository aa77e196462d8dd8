//! Input and view mode types.
//!
//! The plugin shows one of two views, and is either in normal (command) mode
//! or editing one of two text inputs:
//!
//! - **Normal**: single-key commands (`Tab`, `t`, `a`, `/`, `q`, ...)
//! - **Editing**: printable keys go to the focused input
//!
//! # Example
//!
//! ```rust
//! use taskboard::app::modes::{EditTarget, InputMode, ViewMode};
//!
//! let mode = InputMode::Editing(EditTarget::PostQuery);
//! assert!(mode.is_editing());
//! assert_eq!(ViewMode::Tasks.next(), ViewMode::Posts);
//! ```

/// Text input receiving keystrokes in editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Compose bar of the task list.
    TaskDraft,

    /// Search input of the posts panel.
    PostQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,

    Editing(EditTarget),
}

impl InputMode {
    #[must_use]
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

/// Which view fills the plugin pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Tasks,

    Posts,
}

impl ViewMode {
    pub const ALL: [Self; 2] = [Self::Tasks, Self::Posts];

    /// The view `Tab` switches to.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Tasks => Self::Posts,
            Self::Posts => Self::Tasks,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Posts => "Posts",
        }
    }
}
