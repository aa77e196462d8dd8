//! Taskboard: a Zellij plugin with a task list, a theme toggle and a
//! debounced, paginated posts panel.
//!
//! - Task list with add/toggle/delete and All/Active/Completed filters
//! - Dark/light theme toggle restored across sessions
//! - Posts fetched from a remote source, searched with a debounced query and
//!   paginated with automatic page correction
//! - Key-value persistence through a Zellij worker thread

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling, timers, activations              │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!      │             │              │              │
//! ┌──────────┐ ┌───────────┐ ┌─────────────┐ ┌────────────┐
//! │ posts/   │ │ tasks/    │ │ storage/    │ │ ui/        │
//! │ fetch    │ │ list      │ │ JSON doc    │ │ render     │
//! │ debounce │ │ filters   │ │ Persisted   │ │ themes     │
//! │ paginate │ │ selection │ │             │ │            │
//! └──────────┘ └───────────┘ └─────────────┘ └────────────┘
//!                                   │
//!                         ┌───────────────────┐
//!                         │ worker/           │  ← Storage I/O thread
//!                         └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event → state → action loop
//! - [`domain`]: Tasks, posts, errors
//! - [`posts`]: Fetch lifecycle, query debouncing, pagination
//! - [`tasks`]: Task list operations and selection
//! - [`storage`]: Key-value persistence and the plugin-side hook
//! - [`worker`]: Background worker serving storage requests
//! - [`ui`]: Terminal rendering with theme support
//! - [`infrastructure`]: Sandbox paths
//! - `observability`: OpenTelemetry tracing
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/taskboard.wasm" {
//!         theme "catppuccin-mocha"
//!         light_theme "catppuccin-latte"
//!         posts_url "https://jsonplaceholder.typicode.com/posts"
//!         page_size "10"
//!         debounce_ms "300"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use taskboard::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! for event in [Event::StartCompose, Event::Char('h'), Event::Char('i'), Event::Enter] {
//!     let (_render, _actions) = handle_event(&mut state, event)?;
//! }
//! assert_eq!(state.task_list().len(), 1);
//! # Ok::<(), taskboard::TaskboardError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod posts;
pub mod storage;
pub mod tasks;
pub mod ui;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, AppState, EditTarget, Event, InputMode, ViewMode};
pub use domain::{Post, Result, Task, TaskFilter, TaskboardError};
pub use ui::{Theme, ThemeChoice, ThemePair};

use posts::PanelSettings;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default remote source of the posts panel.
pub const DEFAULT_POSTS_URL: &str = "https://jsonplaceholder.typicode.com/posts";

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Plugin configuration parsed from Zellij's configuration map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bundled theme used for the dark choice. Default: `catppuccin-mocha`.
    pub theme_name: Option<String>,

    /// Bundled theme used for the light choice. Default: `catppuccin-latte`.
    pub light_theme: Option<String>,

    /// Custom TOML theme; replaces the dark theme when set.
    pub theme_file: Option<String>,

    /// Tracing filter. Default: `"info"`
    pub trace_level: Option<String>,

    pub posts_url: String,

    /// Posts per page, at least 1.
    pub page_size: usize,

    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme_name: None,
            light_theme: None,
            theme_file: None,
            trace_level: None,
            posts_url: DEFAULT_POSTS_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable or out-of-range values fall back to their defaults:
    ///
    /// - `page_size`: positive integer, default 10
    /// - `debounce_ms`: integer, default 300
    /// - `posts_url`: non-blank string
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use taskboard::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "5".to_string());
    /// map.insert("debounce_ms".to_string(), "oops".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.page_size, 5);
    /// assert_eq!(config.debounce_ms, 300);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let non_blank = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let page_size = config
            .get("page_size")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let debounce_ms = config
            .get("debounce_ms")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS);

        Self {
            theme_name: non_blank("theme"),
            light_theme: non_blank("light_theme"),
            theme_file: non_blank("theme_file"),
            trace_level: non_blank("trace_level"),
            posts_url: non_blank("posts_url").unwrap_or_else(|| DEFAULT_POSTS_URL.to_string()),
            page_size,
            debounce_ms,
        }
    }

    /// Resolves the dark and light palettes.
    ///
    /// The dark slot comes from `theme_file`, then `theme`, then the bundled
    /// default; the light slot from `light_theme`, then the bundled default.
    /// Anything that fails to load is logged and replaced by the default.
    #[must_use]
    pub fn themes(&self) -> ThemePair {
        let dark = self.theme_file.as_ref().map_or_else(
            || Self::named_theme(self.theme_name.as_deref(), Theme::dark),
            |theme_file| {
                let path = infrastructure::expand_tilde(theme_file);
                Theme::from_file(&path).unwrap_or_else(|e| {
                    tracing::debug!(theme_file = %path, error = %e, "failed to load theme from file, using default");
                    Theme::dark()
                })
            },
        );
        let light = Self::named_theme(self.light_theme.as_deref(), Theme::light);

        ThemePair { dark, light }
    }

    fn named_theme(name: Option<&str>, fallback: fn() -> Theme) -> Theme {
        name.map_or_else(fallback, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                fallback()
            })
        })
    }

    #[must_use]
    pub fn panel_settings(&self) -> PanelSettings {
        PanelSettings {
            page_size: self.page_size.max(1),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

/// Builds the initial application state.
///
/// Persisted values start at their defaults; the reads returned by
/// [`AppState::startup_actions`] hydrate them.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        posts_url = %config.posts_url,
        page_size = config.page_size,
        debounce_ms = config.debounce_ms,
        "initializing taskboard plugin"
    );
    AppState::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn parses_every_key() {
        let config = Config::from_zellij(&map(&[
            ("theme", "catppuccin-frappe"),
            ("light_theme", "catppuccin-latte"),
            ("theme_file", "~/theme.toml"),
            ("trace_level", "debug"),
            ("posts_url", "http://localhost:3000/posts"),
            ("page_size", "25"),
            ("debounce_ms", "150"),
        ]));

        assert_eq!(config.theme_name.as_deref(), Some("catppuccin-frappe"));
        assert_eq!(config.light_theme.as_deref(), Some("catppuccin-latte"));
        assert_eq!(config.theme_file.as_deref(), Some("~/theme.toml"));
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
        assert_eq!(config.posts_url, "http://localhost:3000/posts");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.debounce_ms, 150);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = Config::from_zellij(&map(&[("page_size", "0"), ("debounce_ms", "-5")]));
        assert_eq!(config.page_size, 10);
        assert_eq!(config.debounce_ms, 300);

        let config = Config::from_zellij(&map(&[("page_size", "ten")]));
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn blank_url_keeps_default() {
        let config = Config::from_zellij(&map(&[("posts_url", "   ")]));
        assert_eq!(config.posts_url, DEFAULT_POSTS_URL);
    }

    #[test]
    fn panel_settings_follow_config() {
        let config = Config {
            page_size: 4,
            debounce_ms: 50,
            ..Config::default()
        };
        let settings = config.panel_settings();
        assert_eq!(settings.page_size, 4);
        assert_eq!(settings.debounce, Duration::from_millis(50));
    }

    #[test]
    fn themes_resolve_names_and_fall_back() {
        let config = Config {
            theme_name: Some("catppuccin-macchiato".to_string()),
            light_theme: Some("no-such-theme".to_string()),
            ..Config::default()
        };
        let pair = config.themes();
        assert_eq!(pair.dark.name, "catppuccin-macchiato");
        assert_eq!(pair.light.name, "catppuccin-latte");
    }

    #[test]
    fn theme_file_overrides_dark_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let bundled = include_str!("../themes/catppuccin-frappe.toml")
            .replace("catppuccin-frappe", "custom");
        file.write_all(bundled.as_bytes()).unwrap();

        let config = Config {
            theme_name: Some("catppuccin-macchiato".to_string()),
            theme_file: Some(file.path().to_string_lossy().into_owned()),
            ..Config::default()
        };
        assert_eq!(config.themes().dark.name, "custom");
    }

    #[test]
    fn broken_theme_file_falls_back_to_dark_default() {
        let config = Config {
            theme_file: Some("/nonexistent/theme.toml".to_string()),
            ..Config::default()
        };
        assert_eq!(config.themes().dark.name, "catppuccin-mocha");
    }
}
