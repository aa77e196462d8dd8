//! Posts list pipeline.
//!
//! A [`PostsPanel`] is one mounted posts view. It owns the fetch state of its
//! activation, the query debouncer and the current page, and derives the
//! visible page on demand.
//!
//! # Data flow
//!
//! ```text
//! web response ──▶ fetch ──┐
//! keystrokes ──▶ debounce ─┼──▶ paginate::derive_view ──▶ rendered page
//! page keys ──▶ page ──────┘          │
//!                   ▲                 ▼
//!                   └──── PageCorrector (total_pages)
//! ```
//!
//! Every piece of future work the panel hands to the host carries an
//! identity: the web request carries the [`ActivationId`], debounce timers
//! carry a [`TimerId`]. Results addressed to anything but the live identity
//! are dropped, so a torn down or remounted panel is never mutated by late
//! callbacks.

pub mod debounce;
pub mod fetch;
pub mod page;
pub mod paginate;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use debounce::{Query, QueryDebouncer};
pub use fetch::{interpret_response, FetchError, FetchState};
pub use page::{PageCorrector, PageState};
pub use paginate::{derive_view, DerivedView};

/// Identity of one mount of the posts panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ActivationId(pub u64);

/// Identity of one scheduled debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimerId(pub u64);

macro_rules! sequential_id {
    ($($name:ident),*) => {
        $(
            impl $name {
                /// Returns the id following this one.
                #[must_use]
                pub const fn next(self) -> Self {
                    Self(self.0.wrapping_add(1))
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.parse().map(Self)
                }
            }
        )*
    };
}

sequential_id!(ActivationId, TimerId);

/// Tunables of the posts panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    pub page_size: usize,
    pub debounce: Duration,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            debounce: Duration::from_millis(300),
        }
    }
}

/// One mounted posts view.
#[derive(Debug, Clone)]
pub struct PostsPanel {
    activation: ActivationId,
    settings: PanelSettings,
    fetch: FetchState,
    debouncer: QueryDebouncer,
    page: PageState,
    corrector: PageCorrector,
}

impl PostsPanel {
    /// Mounts a panel whose fetch is already in flight.
    #[must_use]
    pub fn mount(activation: ActivationId, settings: PanelSettings) -> Self {
        tracing::debug!(%activation, "Mounting posts panel");
        let mut panel = Self {
            activation,
            settings,
            fetch: FetchState::Loading,
            debouncer: QueryDebouncer::new(settings.debounce),
            page: PageState::default(),
            corrector: PageCorrector::default(),
        };
        panel.settle();
        panel
    }

    #[must_use]
    pub const fn activation(&self) -> ActivationId {
        self.activation
    }

    #[must_use]
    pub const fn settings(&self) -> PanelSettings {
        self.settings
    }

    #[must_use]
    pub const fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    #[must_use]
    pub const fn query(&self) -> &Query {
        self.debouncer.query()
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page.current()
    }

    /// Applies an HTTP response addressed to `activation`.
    ///
    /// Returns `false` without touching state when the response belongs to
    /// another activation or the fetch already settled.
    pub fn on_response(&mut self, activation: ActivationId, status: u16, body: &[u8]) -> bool {
        if !self.accepts(activation) {
            return false;
        }
        let state = FetchState::from(interpret_response(status, body));
        match &state {
            FetchState::Success(posts) => {
                tracing::debug!(%activation, count = posts.len(), "Posts loaded");
            }
            FetchState::Failure(message) => {
                tracing::warn!(%activation, status, error = %message, "Posts fetch failed");
            }
            FetchState::Idle | FetchState::Loading => {}
        }
        self.fetch = state;
        self.settle();
        true
    }

    /// Fails the fetch of `activation` without a response, e.g. when the host
    /// refused to issue the request.
    pub fn on_failure(&mut self, activation: ActivationId, message: impl Into<String>) -> bool {
        if !self.accepts(activation) {
            return false;
        }
        self.fetch = FetchState::failure(message);
        self.settle();
        true
    }

    /// Replaces the raw query, resets to page 1 and schedules `timer`.
    ///
    /// Returns the delay after which the host must fire `timer`.
    pub fn on_query_input(&mut self, raw: String, timer: TimerId) -> Duration {
        let delay = self.debouncer.update(raw, timer);
        self.page.reset();
        self.settle();
        delay
    }

    /// Handles an elapsed debounce timer. Returns whether the debounced query
    /// changed.
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        let emitted = self.debouncer.fire(timer).map(str::to_owned);
        match emitted {
            Some(query) => {
                tracing::debug!(%timer, query = %query, "Debounced query applied");
                self.settle();
                true
            }
            None => false,
        }
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.view().total_pages;
        let moved = self.page.next(total);
        self.settle();
        moved
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.page.prev();
        self.settle();
        moved
    }

    /// Derives the visible page from the current state.
    #[must_use]
    pub fn view(&self) -> DerivedView<'_> {
        derive_view(
            self.fetch.records(),
            &self.debouncer.query().debounced,
            self.page.current(),
            self.settings.page_size,
        )
    }

    /// Drops all pending work of this activation.
    pub fn teardown(&mut self) {
        tracing::debug!(activation = %self.activation, "Tearing down posts panel");
        self.debouncer.cancel();
    }

    fn accepts(&self, activation: ActivationId) -> bool {
        if activation != self.activation {
            tracing::debug!(%activation, live = %self.activation, "Dropping stale posts response");
            return false;
        }
        if !self.fetch.is_loading() {
            tracing::debug!(%activation, "Fetch already settled, ignoring response");
            return false;
        }
        true
    }

    fn settle(&mut self) {
        let total_pages = self.view().total_pages;
        self.corrector.observe(total_pages, &mut self.page);
    }
}
