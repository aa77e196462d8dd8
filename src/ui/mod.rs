//! Terminal UI.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready snapshot of the state
//! - [`renderer`]: Frame entry point
//! - [`components`]: Region renderers and per-view layouts
//! - [`helpers`]: Cursor positioning, truncation, match highlighting
//! - [`theme`]: Palettes, dark/light choice, ANSI escapes

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::{Theme, ThemeChoice, ThemePair};
pub use viewmodel::{
    BodyView, EmptyState, FooterInfo, HeaderInfo, PagerInfo, PostItem, PostsContent, PostsView,
    SearchBarInfo, TabInfo, TaskItem, TasksView, UIViewModel,
};
