//! Current page and its bounds correction.

/// One-based current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl PageState {
    #[must_use]
    pub const fn current(self) -> usize {
        self.current
    }

    /// Advances one page without passing `total_pages`. Returns whether it moved.
    pub fn next(&mut self, total_pages: usize) -> bool {
        let target = (self.current + 1).min(total_pages.max(1));
        self.set(target)
    }

    /// Goes back one page, stopping at 1. Returns whether it moved.
    pub fn prev(&mut self) -> bool {
        let target = self.current.saturating_sub(1).max(1);
        self.set(target)
    }

    pub fn reset(&mut self) -> bool {
        self.set(1)
    }

    fn set(&mut self, target: usize) -> bool {
        let changed = self.current != target;
        self.current = target;
        changed
    }
}

/// Resets the page to 1 when the page count drops below it.
///
/// Remembers the last observed `(total_pages, current)` pair and does nothing
/// when it is unchanged.
#[derive(Debug, Clone, Default)]
pub struct PageCorrector {
    last: Option<(usize, usize)>,
}

impl PageCorrector {
    /// Returns whether `page` was reset.
    pub fn observe(&mut self, total_pages: usize, page: &mut PageState) -> bool {
        let pair = (total_pages, page.current());
        if self.last == Some(pair) {
            return false;
        }

        let corrected = page.current() > total_pages && page.reset();
        if corrected {
            tracing::debug!(total_pages, "Page out of range, reset to 1");
        }
        self.last = Some((total_pages, page.current()));
        corrected
    }
}
