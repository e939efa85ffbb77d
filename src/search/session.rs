//! Search overlay session: the typed term, its debouncer, and its result slot.

use super::debounce::{Debouncer, InputOutcome};
use super::slot::{CommitOutcome, RequestToken, ResultSlot, SlotView};
use crate::domain::{SearchQuery, SearchResult};
use std::time::{Duration, Instant};

/// State of one search overlay instance.
#[derive(Debug, Clone)]
pub struct SearchSession {
    term: String,
    debouncer: Debouncer,
    slot: ResultSlot,
}

impl SearchSession {
    #[must_use]
    pub fn new(quiet: Duration, min_length: usize, limit: u32) -> Self {
        Self {
            term: String::new(),
            debouncer: Debouncer::new(quiet, min_length, limit),
            slot: ResultSlot::new(),
        }
    }

    /// Records the input field's new value.
    ///
    /// An empty value clears the slot in the same call. A short value only
    /// cancels the pending fire; the last result stays until replaced.
    pub fn input(&mut self, term: &str, now: Instant) -> InputOutcome {
        self.term = term.to_string();
        let outcome = self.debouncer.input(term, now);

        if outcome == InputOutcome::Cleared {
            self.slot.clear();
        }

        outcome
    }

    /// Issues the pending query if its quiet interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<(RequestToken, SearchQuery)> {
        let query = self.debouncer.poll(now)?;
        Some(self.issue(query))
    }

    /// Explicit submit.
    ///
    /// Fires the pending query immediately. With nothing pending, re-issues
    /// the current term when the last attempt failed, which is the retry
    /// affordance.
    pub fn submit(&mut self) -> Option<(RequestToken, SearchQuery)> {
        if let Some(query) = self.debouncer.flush() {
            return Some(self.issue(query));
        }

        if matches!(self.slot.view(), SlotView::Failed { .. }) {
            let term = self.term.trim();
            if term.chars().count() >= self.debouncer.min_length() {
                tracing::debug!(term = %term, "retrying failed search");
                let query = SearchQuery {
                    term: term.to_string(),
                    limit: self.debouncer.limit(),
                };
                return Some(self.issue(query));
            }
        }

        None
    }

    pub fn commit(&mut self, token: RequestToken, outcome: Result<SearchResult, String>) -> CommitOutcome {
        self.slot.commit(token, outcome)
    }

    /// Closes the session: clears the term, cancels the timer, empties the slot.
    pub fn reset(&mut self) {
        self.term.clear();
        self.debouncer.cancel();
        self.slot.clear();
    }

    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    #[must_use]
    pub fn view(&self) -> SlotView<'_> {
        self.slot.view()
    }

    fn issue(&mut self, query: SearchQuery) -> (RequestToken, SearchQuery) {
        let token = self.slot.issue(query.clone());
        tracing::debug!(token = %token, term = %query.term, limit = query.limit, "search request issued");
        (token, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SearchSession {
        SearchSession::new(Duration::from_millis(300), 2, 6)
    }

    #[test]
    fn empty_input_clears_synchronously() {
        let mut s = session();
        let t0 = Instant::now();

        s.input("bags", t0);
        let (token, _) = s.poll(t0 + Duration::from_millis(300)).unwrap();
        s.commit(token, Ok(SearchResult::empty()));
        assert!(matches!(s.view(), SlotView::NoResults { .. }));

        assert_eq!(s.input("", t0 + Duration::from_millis(400)), InputOutcome::Cleared);
        assert_eq!(s.view(), SlotView::Idle);
    }

    #[test]
    fn submit_retries_after_failure() {
        let mut s = session();
        let t0 = Instant::now();

        s.input("gold", t0);
        let (token, _) = s.submit().unwrap();
        s.commit(token, Err("offline".into()));

        let (retry, query) = s.submit().unwrap();
        assert!(retry > token);
        assert_eq!(query.term, "gold");
        assert_eq!(s.submit(), None);
    }

    #[test]
    fn reset_drops_in_flight_responses() {
        let mut s = session();
        let t0 = Instant::now();

        s.input("perfume", t0);
        let (token, _) = s.submit().unwrap();
        s.reset();

        assert_eq!(s.term(), "");
        assert_eq!(s.commit(token, Ok(SearchResult::empty())), CommitOutcome::Stale);
        assert_eq!(s.next_deadline(), None);
    }
}
