//! View models consumed by the renderer.
//!
//! Computed by `AppState::compute_viewmodel` from a state snapshot. They hold
//! display-ready strings, flags and highlight ranges and no logic.

/// Everything the renderer draws for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    pub body: BodyView,
    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub tabs: Vec<TabInfo>,
    /// `"dark"` or `"light"`.
    pub theme_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyView {
    Tasks(TasksView),
    Posts(PostsView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksView {
    /// Filter buttons, the active one flagged.
    pub filters: Vec<TabInfo>,
    /// Compose bar contents while composing.
    pub compose: Option<String>,
    pub items: Vec<TaskItem>,
    pub empty_state: Option<EmptyState>,
    /// `"<n> tasks remaining"`.
    pub stats: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub text: String,
    pub completed: bool,
    pub is_selected: bool,
    pub age: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsView {
    pub search_bar: SearchBarInfo,
    pub content: PostsContent,
    /// Hidden while loading or failed.
    pub pager: Option<PagerInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsContent {
    /// Placeholder rows while the fetch is pending.
    Loading { skeleton_rows: usize },
    /// Fetch failure message, rendered as `Error: <message>`.
    Failed { message: String },
    Empty(EmptyState),
    Items(Vec<PostItem>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostItem {
    pub title: String,
    pub body: String,
    /// Char ranges of `title` matching the debounced query (end exclusive).
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerInfo {
    pub current: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PagerInfo {
    #[must_use]
    pub fn label(&self) -> String {
        format!("Page {} / {}", self.current, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub focused: bool,
}
