//! Query debouncer.
//!
//! The host timer cannot be cancelled, so cancellation is by identity: every
//! update supersedes the pending [`TimerId`], and a fired timer only emits
//! when it is still the pending one.

use std::time::Duration;

use super::TimerId;

/// Raw and debounced search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Text exactly as typed.
    pub raw: String,
    /// Trimmed text as of the last quiet interval.
    pub debounced: String,
}

#[derive(Debug, Clone)]
pub struct QueryDebouncer {
    query: Query,
    pending: Option<TimerId>,
    quiet: Duration,
}

impl QueryDebouncer {
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            query: Query {
                raw: String::new(),
                debounced: String::new(),
            },
            pending: None,
            quiet,
        }
    }

    #[must_use]
    pub const fn query(&self) -> &Query {
        &self.query
    }

    #[must_use]
    pub const fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Stores `raw` and makes `timer` the only pending emission.
    ///
    /// Returns the delay after which the caller must deliver `timer` back
    /// through [`QueryDebouncer::fire`].
    pub fn update(&mut self, raw: String, timer: TimerId) -> Duration {
        self.query.raw = raw;
        self.pending = Some(timer);
        self.quiet
    }

    /// Handles an elapsed timer.
    ///
    /// Returns the newly debounced text when `timer` was pending and the
    /// trimmed text differs from the current debounced value. `None` for a
    /// superseded or cancelled timer, or when nothing changed.
    pub fn fire(&mut self, timer: TimerId) -> Option<&str> {
        if self.pending != Some(timer) {
            return None;
        }
        self.pending = None;
        let trimmed = self.query.raw.trim();
        if trimmed == self.query.debounced {
            return None;
        }
        self.query.debounced = trimmed.to_string();
        Some(&self.query.debounced)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config;

    const QUIET: Duration = Duration::from_millis(300);

    #[test]
    fn burst_emits_once_with_last_value() {
        let mut debouncer = QueryDebouncer::new(QUIET);
        for (i, raw) in ["r", "ru", "rus", " rust "].iter().enumerate() {
            assert_eq!(debouncer.update((*raw).to_string(), TimerId(i as u64)), QUIET);
        }

        for stale in 0..3 {
            assert_eq!(debouncer.fire(TimerId(stale)), None);
        }
        assert_eq!(debouncer.query().debounced, "");

        assert_eq!(debouncer.fire(TimerId(3)), Some("rust"));
        assert_eq!(debouncer.query().raw, " rust ");
        assert_eq!(debouncer.pending(), None);
    }

    #[test]
    fn cancelled_timer_never_emits() {
        let mut debouncer = QueryDebouncer::new(QUIET);
        debouncer.update("abc".to_string(), TimerId(9));
        debouncer.cancel();
        assert_eq!(debouncer.fire(TimerId(9)), None);
        assert_eq!(debouncer.query().debounced, "");
    }

    #[test]
    fn timer_fires_at_most_once() {
        let mut debouncer = QueryDebouncer::new(QUIET);
        debouncer.update("x".to_string(), TimerId(1));
        assert_eq!(debouncer.fire(TimerId(1)), Some("x"));
        assert_eq!(debouncer.fire(TimerId(1)), None);
    }

    #[test]
    fn padding_only_change_does_not_emit() {
        let mut debouncer = QueryDebouncer::new(QUIET);
        debouncer.update("abc".to_string(), TimerId(1));
        assert_eq!(debouncer.fire(TimerId(1)), Some("abc"));

        debouncer.update("abc ".to_string(), TimerId(2));
        assert_eq!(debouncer.fire(TimerId(2)), None);
        assert_eq!(debouncer.pending(), None);
        assert_eq!(debouncer.query().raw, "abc ");
        assert_eq!(debouncer.query().debounced, "abc");
    }

    proptest! {
        #![proptest_config(Config::with_cases(128))]
        #[test]
        fn any_burst_collapses_to_its_last_value(
            burst in prop::collection::vec("[a-c ]{0,5}", 1..20),
        ) {
            let mut debouncer = QueryDebouncer::new(QUIET);
            for (i, raw) in burst.iter().enumerate() {
                debouncer.update(raw.clone(), TimerId(i as u64));
            }

            let mut emitted = Vec::new();
            for i in 0..burst.len() {
                if let Some(value) = debouncer.fire(TimerId(i as u64)) {
                    emitted.push(value.to_string());
                }
            }

            let last = burst[burst.len() - 1].trim();
            let expected: Vec<String> = if last.is_empty() { vec![] } else { vec![last.to_string()] };
            prop_assert_eq!(emitted, expected);
            prop_assert_eq!(debouncer.query().debounced.as_str(), last);
            prop_assert_eq!(debouncer.pending(), None);
        }
    }
}
