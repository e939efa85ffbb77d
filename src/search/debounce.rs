//! Query debouncer with an explicit, cancellable deadline.
//!
//! The debouncer owns no timer. Callers report input with the current
//! [`Instant`] and later [`Debouncer::poll`] with the time they were woken; a
//! query fires only once the quiet interval has elapsed since the last change.
//! [`Debouncer::next_deadline`] tells the runtime when to wake next.

use crate::domain::SearchQuery;
use std::time::{Duration, Instant};

/// What happened to a reported input value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Input is empty. Any pending fire was cancelled and displayed results
    /// should be cleared now.
    Cleared,

    /// Input is shorter than the minimum length. Any pending fire was
    /// cancelled.
    BelowMinimum,

    /// A lookup is scheduled for `deadline` unless more input arrives first.
    Scheduled { deadline: Instant },
}

#[derive(Debug, Clone)]
struct Pending {
    term: String,
    deadline: Instant,
}

/// Delays remote lookups until input pauses.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    min_length: usize,
    limit: u32,
    pending: Option<Pending>,
}

impl Debouncer {
    /// Creates a debouncer.
    ///
    /// `min_length` is counted in characters after trimming surrounding
    /// whitespace; `limit` is copied into every emitted [`SearchQuery`].
    #[must_use]
    pub const fn new(quiet: Duration, min_length: usize, limit: u32) -> Self {
        Self {
            quiet,
            min_length,
            limit,
            pending: None,
        }
    }

    /// Records a new input value observed at `now`.
    ///
    /// Every call restarts the quiet interval. Inputs that are empty or too
    /// short cancel whatever was pending.
    pub fn input(&mut self, term: &str, now: Instant) -> InputOutcome {
        let term = term.trim();

        if term.is_empty() {
            self.cancel();
            return InputOutcome::Cleared;
        }

        if term.chars().count() < self.min_length {
            self.cancel();
            tracing::trace!(term_len = term.chars().count(), min = self.min_length, "input below minimum length");
            return InputOutcome::BelowMinimum;
        }

        let deadline = now + self.quiet;
        self.pending = Some(Pending {
            term: term.to_string(),
            deadline,
        });

        InputOutcome::Scheduled { deadline }
    }

    /// Fires the pending query if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchQuery> {
        if self.pending.as_ref().is_some_and(|p| now >= p.deadline) {
            return self.flush();
        }
        None
    }

    /// Fires the pending query immediately, regardless of its deadline.
    pub fn flush(&mut self) -> Option<SearchQuery> {
        self.pending.take().map(|pending| SearchQuery {
            term: pending.term,
            limit: self.limit,
        })
    }

    /// Drops the pending query, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::trace!(term = %pending.term, "pending search cancelled");
        }
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Minimum accepted term length, in characters.
    #[must_use]
    pub const fn min_length(&self) -> usize {
        self.min_length
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn debouncer() -> Debouncer {
        Debouncer::new(Duration::from_millis(300), 2, 6)
    }

    #[test]
    fn fires_only_after_quiet_interval() {
        let mut d = debouncer();
        let t0 = Instant::now();

        assert_eq!(
            d.input("dress", t0),
            InputOutcome::Scheduled {
                deadline: t0 + Duration::from_millis(300)
            }
        );
        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);

        let fired = d.poll(t0 + Duration::from_millis(300)).unwrap();
        assert_eq!(fired.term, "dress");
        assert_eq!(fired.limit, 6);
        assert!(!d.is_pending());
    }

    #[test]
    fn new_input_restarts_the_interval() {
        let mut d = debouncer();
        let t0 = Instant::now();

        d.input("dress", t0);
        d.input("dresses", t0 + Duration::from_millis(200));

        assert_eq!(d.poll(t0 + Duration::from_millis(350)), None);
        let fired = d.poll(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(fired.term, "dresses");
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn short_or_empty_input_cancels_pending() {
        let mut d = debouncer();
        let t0 = Instant::now();

        d.input("dress", t0);
        assert_eq!(d.input("d", t0 + Duration::from_millis(10)), InputOutcome::BelowMinimum);
        assert_eq!(d.next_deadline(), None);
        assert_eq!(d.poll(t0 + Duration::from_secs(1)), None);

        d.input("dress", t0);
        assert_eq!(d.input("   ", t0), InputOutcome::Cleared);
        assert!(!d.is_pending());
    }

    #[test]
    fn length_is_counted_in_characters_after_trimming() {
        let mut d = debouncer();
        let t0 = Instant::now();

        assert_eq!(d.input(" a ", t0), InputOutcome::BelowMinimum);
        assert!(matches!(d.input("فس", t0), InputOutcome::Scheduled { .. }));
    }

    #[test]
    fn flush_fires_early() {
        let mut d = debouncer();
        let t0 = Instant::now();

        d.input("  gold  ", t0);
        let fired = d.flush().unwrap();
        assert_eq!(fired.term, "gold");
        assert_eq!(d.flush(), None);
    }
}
