//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth of the plugin thread. It owns
//! the persisted task list and theme choice, the view and input modes, and at
//! most one mounted [`PostsPanel`].
//!
//! # Posts panel lifecycle
//!
//! The panel exists only while the Posts view is shown and the plugin is
//! visible. Mounting allocates a new [`ActivationId`] and requests one fetch;
//! tearing down drops the panel, so any response or timer still in flight for
//! it finds no owner (or a newer activation) and is discarded.
//!
//! # Example
//!
//! ```rust
//! use taskboard::app::AppState;
//! use taskboard::Config;
//!
//! let state = AppState::new(&Config::default());
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert_eq!(viewmodel.header.tabs.len(), 2);
//! ```

use super::modes::{EditTarget, InputMode, ViewMode};
use super::timers::TimerQueue;
use super::Action;
use crate::domain::TaskFilter;
use crate::posts::{ActivationId, FetchState, PanelSettings, PostsPanel};
use crate::storage::{Persisted, TASKS_KEY, THEME_KEY};
use crate::tasks::{TaskList, TaskView};
use crate::ui::theme::{Theme, ThemeChoice, ThemePair};
use crate::ui::viewmodel::{
    BodyView, EmptyState, FooterInfo, HeaderInfo, PagerInfo, PostItem, PostsContent, PostsView,
    SearchBarInfo, TabInfo, TaskItem, TasksView, UIViewModel,
};
use crate::ui::helpers::{match_ranges, truncate};
use crate::Config;

/// Failure shown when the host refused network access.
pub const WEB_ACCESS_DENIED: &str = "Web access permission denied";

/// Rows used by header, tab borders, footer and the stats/pager line.
const CHROME_ROWS: usize = 7;

/// Whether the host lets the plugin issue web requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebAccess {
    #[default]
    Pending,
    Granted,
    Denied,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view_mode: ViewMode,
    pub input_mode: InputMode,

    pub themes: ThemePair,
    pub theme_choice: Persisted<ThemeChoice>,

    pub tasks: Persisted<TaskList>,
    pub task_view: TaskView,
    /// Text of the compose bar.
    pub draft: String,

    /// Mounted posts panel, if the Posts view is live.
    pub posts: Option<PostsPanel>,
    pub posts_url: String,
    pub panel_settings: PanelSettings,

    pub web_access: WebAccess,
    pub visible: bool,

    last_activation: ActivationId,
    pub(crate) timers: TimerQueue,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            view_mode: ViewMode::default(),
            input_mode: InputMode::Normal,
            themes: config.themes(),
            theme_choice: Persisted::new(THEME_KEY, ThemeChoice::default()),
            tasks: Persisted::new(TASKS_KEY, TaskList::default()),
            task_view: TaskView::default(),
            draft: String::new(),
            posts: None,
            posts_url: config.posts_url.clone(),
            panel_settings: config.panel_settings(),
            web_access: WebAccess::Pending,
            visible: true,
            last_activation: ActivationId::default(),
            timers: TimerQueue::default(),
        }
    }

    /// Read requests that hydrate the persisted values.
    #[must_use]
    pub fn startup_actions(&self) -> Vec<Action> {
        vec![
            Action::PostToWorker(self.tasks.read_request()),
            Action::PostToWorker(self.theme_choice.read_request()),
        ]
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        self.themes.get(*self.theme_choice.get())
    }

    #[must_use]
    pub fn task_list(&self) -> &TaskList {
        self.tasks.get()
    }

    /// Mounts a fresh posts panel, tearing down any previous one.
    pub fn mount_posts(&mut self) -> Vec<Action> {
        self.teardown_posts();

        self.last_activation = self.last_activation.next();
        let activation = self.last_activation;
        let mut panel = PostsPanel::mount(activation, self.panel_settings);

        let actions = match self.web_access {
            WebAccess::Granted => vec![Action::FetchPosts {
                url: self.posts_url.clone(),
                activation,
            }],
            WebAccess::Denied => {
                panel.on_failure(activation, WEB_ACCESS_DENIED);
                vec![]
            }
            WebAccess::Pending => {
                tracing::debug!(%activation, "Web access pending, deferring fetch");
                vec![]
            }
        };

        self.posts = Some(panel);
        actions
    }

    /// Drops the mounted posts panel and leaves the search input.
    pub fn teardown_posts(&mut self) {
        if let Some(mut panel) = self.posts.take() {
            panel.teardown();
        }
        if self.input_mode == InputMode::Editing(EditTarget::PostQuery) {
            self.input_mode = InputMode::Normal;
        }
    }

    /// Whether a posts panel should be mounted right now.
    #[must_use]
    pub fn posts_live(&self) -> bool {
        self.view_mode == ViewMode::Posts && self.visible
    }

    /// Applies a permission decision; a panel waiting for it fetches or fails.
    pub fn set_web_access(&mut self, granted: bool) -> Vec<Action> {
        let was_pending = self.web_access == WebAccess::Pending;
        self.web_access = if granted {
            WebAccess::Granted
        } else {
            WebAccess::Denied
        };

        if !was_pending {
            return vec![];
        }

        let Some(panel) = self.posts.as_mut() else {
            return vec![];
        };
        if !panel.fetch_state().is_loading() {
            return vec![];
        }

        let activation = panel.activation();
        if granted {
            vec![Action::FetchPosts {
                url: self.posts_url.clone(),
                activation,
            }]
        } else {
            panel.on_failure(activation, WEB_ACCESS_DENIED);
            vec![]
        }
    }

    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let body = match self.view_mode {
            ViewMode::Tasks => BodyView::Tasks(self.compute_tasks_view(rows, cols)),
            ViewMode::Posts => BodyView::Posts(self.compute_posts_view(rows, cols)),
        };

        UIViewModel {
            header: self.compute_header(),
            body,
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        HeaderInfo {
            title: " Taskboard ".to_string(),
            tabs: ViewMode::ALL
                .iter()
                .map(|view| TabInfo {
                    label: view.label().to_string(),
                    active: *view == self.view_mode,
                })
                .collect(),
            theme_label: self.theme_choice.get().label().to_string(),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.view_mode) {
            (InputMode::Editing(EditTarget::TaskDraft), _) => "Enter: add  Esc: cancel  Type your task",
            (InputMode::Editing(EditTarget::PostQuery), _) => "Enter/Esc: done  Type to search",
            (InputMode::Normal, ViewMode::Tasks) => {
                "a: add  j/k: move  space: toggle  d: delete  1/2/3 f: filter  Tab: posts  t: theme  q: quit"
            }
            (InputMode::Normal, ViewMode::Posts) => {
                "/: search  h/l: page  Tab: tasks  t: theme  q: quit"
            }
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    /// Rows left for list content after chrome and the optional input bar.
    const fn available_rows(total_rows: usize, input_bar: bool) -> usize {
        let chrome = if input_bar { CHROME_ROWS + 3 } else { CHROME_ROWS };
        total_rows.saturating_sub(chrome)
    }

    fn compute_tasks_view(&self, rows: usize, cols: usize) -> TasksView {
        let list = self.tasks.get();
        let filter = self.task_view.filter;
        let filtered = list.filtered(filter);
        let composing = self.input_mode == InputMode::Editing(EditTarget::TaskDraft);
        let now = chrono::Utc::now();

        let available = Self::available_rows(rows, composing).max(1);
        let selected = self.task_view.selected.min(filtered.len().saturating_sub(1));
        let mut start = selected.saturating_sub(available / 2).min(filtered.len());
        let end = (start + available).min(filtered.len());
        if end - start < available && filtered.len() >= available {
            start = end.saturating_sub(available);
        }

        let text_width = cols.saturating_sub(16);
        let items = filtered[start..end]
            .iter()
            .enumerate()
            .map(|(offset, task)| TaskItem {
                text: truncate(&task.text, text_width),
                completed: task.completed,
                is_selected: start + offset == selected,
                age: task.time_ago(now),
            })
            .collect::<Vec<_>>();

        let empty_state = filtered.is_empty().then(|| EmptyState {
            message: "No tasks found".to_string(),
            subtitle: match filter {
                TaskFilter::All => "Press a to add your first task".to_string(),
                TaskFilter::Active | TaskFilter::Completed => {
                    format!("No {} tasks", filter.label().to_lowercase())
                }
            },
        });

        TasksView {
            filters: TaskFilter::ALL
                .iter()
                .map(|f| TabInfo {
                    label: f.label().to_string(),
                    active: *f == filter,
                })
                .collect(),
            compose: composing.then(|| self.draft.clone()),
            items,
            empty_state,
            stats: format!("{} tasks remaining", list.remaining()),
        }
    }

    fn compute_posts_view(&self, rows: usize, cols: usize) -> PostsView {
        let focused = self.input_mode == InputMode::Editing(EditTarget::PostQuery);
        let Some(panel) = &self.posts else {
            return PostsView {
                search_bar: SearchBarInfo {
                    query: String::new(),
                    focused,
                },
                content: PostsContent::Loading { skeleton_rows: 0 },
                pager: None,
            };
        };

        let search_bar = SearchBarInfo {
            query: panel.query().raw.clone(),
            focused,
        };
        let page_size = panel.settings().page_size;

        let content = match panel.fetch_state() {
            FetchState::Idle | FetchState::Loading => PostsContent::Loading {
                skeleton_rows: page_size.min(Self::available_rows(rows, true) / 2).max(1),
            },
            FetchState::Failure(message) => PostsContent::Failed {
                message: message.clone(),
            },
            FetchState::Success(_) => {
                let view = panel.view();
                if view.paged().is_empty() {
                    PostsContent::Empty(EmptyState {
                        message: "No matching posts".to_string(),
                        subtitle: "Try a different search".to_string(),
                    })
                } else {
                    let query = &panel.query().debounced;
                    let width = cols.saturating_sub(4);
                    PostsContent::Items(
                        view.paged()
                            .iter()
                            .map(|post| {
                                let title = truncate(&post.title, width);
                                PostItem {
                                    highlight_ranges: match_ranges(&title, query),
                                    title,
                                    body: truncate(&post.body.replace('\n', " "), width),
                                }
                            })
                            .collect(),
                    )
                }
            }
        };

        let pager = matches!(panel.fetch_state(), FetchState::Success(_)).then(|| {
            let total = panel.view().total_pages;
            let current = panel.page();
            PagerInfo {
                current,
                total,
                has_prev: current > 1,
                has_next: current < total,
            }
        });

        PostsView {
            search_bar,
            content,
            pager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(&Config::default())
    }

    #[test]
    fn mount_with_granted_access_fetches_once() {
        let mut state = state();
        state.web_access = WebAccess::Granted;
        state.view_mode = ViewMode::Posts;

        let actions = state.mount_posts();
        assert_eq!(
            actions,
            vec![Action::FetchPosts {
                url: Config::default().posts_url,
                activation: ActivationId(1),
            }]
        );

        let again = state.mount_posts();
        assert!(matches!(
            again.as_slice(),
            [Action::FetchPosts { activation: ActivationId(2), .. }]
        ));
    }

    #[test]
    fn pending_access_defers_fetch_until_granted() {
        let mut state = state();
        assert!(state.mount_posts().is_empty());

        let actions = state.set_web_access(true);
        assert!(matches!(
            actions.as_slice(),
            [Action::FetchPosts { activation: ActivationId(1), .. }]
        ));
        assert!(state.set_web_access(true).is_empty());
    }

    #[test]
    fn denied_access_fails_the_panel() {
        let mut state = state();
        state.mount_posts();
        state.set_web_access(false);

        let panel = state.posts.as_ref().unwrap();
        assert_eq!(panel.fetch_state().error(), Some(WEB_ACCESS_DENIED));
    }

    #[test]
    fn tasks_viewmodel_shows_empty_state_and_stats() {
        let state = state();
        let vm = state.compute_viewmodel(24, 80);
        let BodyView::Tasks(tasks) = vm.body else {
            panic!("expected tasks view");
        };
        assert_eq!(tasks.empty_state.unwrap().message, "No tasks found");
        assert_eq!(tasks.stats, "0 tasks remaining");
        assert!(tasks.filters[0].active);
    }

    #[test]
    fn posts_viewmodel_renders_skeleton_then_pager() {
        let mut state = state();
        state.view_mode = ViewMode::Posts;
        state.web_access = WebAccess::Granted;
        state.mount_posts();

        let vm = state.compute_viewmodel(30, 80);
        let BodyView::Posts(posts) = vm.body else {
            panic!("expected posts view");
        };
        assert!(matches!(posts.content, PostsContent::Loading { skeleton_rows } if skeleton_rows > 0));
        assert!(posts.pager.is_none());

        let body = br#"[{"id": 1, "title": "Hello", "body": "world"}]"#;
        state.posts.as_mut().unwrap().on_response(ActivationId(1), 200, body);
        let vm = state.compute_viewmodel(30, 80);
        let BodyView::Posts(posts) = vm.body else {
            panic!("expected posts view");
        };
        let pager = posts.pager.unwrap();
        assert_eq!(pager.label(), "Page 1 / 1");
        assert!(!pager.has_prev && !pager.has_next);
    }
}
