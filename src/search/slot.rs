//! Single-slot result cache with a stale-response guard.
//!
//! Every issued request gets a fresh [`RequestToken`]. A response commits only
//! when its token is the one currently in flight; anything else is a response
//! to a superseded (or cancelled) request and is dropped without touching the
//! displayed result.

use crate::domain::{SearchQuery, SearchResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an issued search request. Strictly increasing per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of offering a response to the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Response was current and is now displayed.
    Applied,
    /// Response was current but the request failed; last-good result kept.
    Failed,
    /// Response belonged to a superseded request and was dropped.
    Stale,
}

/// Read-only view of the slot for view-model computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotView<'a> {
    /// Nothing requested since the slot was last cleared.
    Idle,

    /// A request is in flight. `previous` is the last-good result, still shown.
    Searching {
        query: &'a SearchQuery,
        previous: Option<&'a SearchResult>,
    },

    /// The latest committed result is empty.
    NoResults { query: &'a SearchQuery },

    /// The latest committed result has hits.
    Results {
        query: &'a SearchQuery,
        result: &'a SearchResult,
    },

    /// The latest request failed and nothing is in flight.
    Failed {
        message: &'a str,
        previous: Option<&'a SearchResult>,
    },
}

#[derive(Debug, Clone)]
struct InFlight {
    token: RequestToken,
    query: SearchQuery,
}

/// Holds the most recent search result for one overlay.
#[derive(Debug, Clone, Default)]
pub struct ResultSlot {
    last_issued: u64,
    in_flight: Option<InFlight>,
    current: Option<(SearchQuery, SearchResult)>,
    last_error: Option<String>,
}

impl ResultSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new outgoing request, superseding any in flight.
    pub fn issue(&mut self, query: SearchQuery) -> RequestToken {
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);

        if let Some(previous) = &self.in_flight {
            tracing::debug!(superseded = %previous.token, by = %token, "search request superseded");
        }

        self.in_flight = Some(InFlight { token, query });
        token
    }

    /// Offers a response for `token`.
    ///
    /// `outcome` is the normalized result or a transport failure message.
    pub fn commit(&mut self, token: RequestToken, outcome: Result<SearchResult, String>) -> CommitOutcome {
        let is_current = self.in_flight.as_ref().is_some_and(|f| f.token == token);
        if !is_current {
            tracing::debug!(token = %token, latest = self.last_issued, "dropping stale search response");
            return CommitOutcome::Stale;
        }

        let Some(InFlight { query, .. }) = self.in_flight.take() else {
            return CommitOutcome::Stale;
        };

        match outcome {
            Ok(result) => {
                tracing::debug!(token = %token, term = %query.term, total = result.total_results, "search result committed");
                self.current = Some((query, result));
                self.last_error = None;
                CommitOutcome::Applied
            }
            Err(message) => {
                tracing::warn!(token = %token, term = %query.term, error = %message, "search request failed");
                self.last_error = Some(message);
                CommitOutcome::Failed
            }
        }
    }

    /// Empties the slot and invalidates whatever is in flight.
    ///
    /// The token counter is not reset, so late responses still compare stale.
    pub fn clear(&mut self) {
        self.in_flight = None;
        self.current = None;
        self.last_error = None;
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&SearchResult> {
        self.current.as_ref().map(|(_, result)| result)
    }

    #[must_use]
    pub fn view(&self) -> SlotView<'_> {
        let previous = self.current();

        if let Some(in_flight) = &self.in_flight {
            return SlotView::Searching {
                query: &in_flight.query,
                previous,
            };
        }

        if let Some(message) = &self.last_error {
            return SlotView::Failed { message, previous };
        }

        match &self.current {
            None => SlotView::Idle,
            Some((query, result)) if result.is_empty() => SlotView::NoResults { query },
            Some((query, result)) => SlotView::Results { query, result },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{QuerySuggestion, SearchResult};

    fn query(term: &str) -> SearchQuery {
        SearchQuery {
            term: term.to_string(),
            limit: 6,
        }
    }

    fn result_with(text: &str) -> SearchResult {
        SearchResult::from_buckets(
            vec![],
            vec![],
            vec![],
            vec![],
            vec![QuerySuggestion { text: text.to_string() }],
        )
    }

    #[test]
    fn tokens_increase() {
        let mut slot = ResultSlot::new();
        let a = slot.issue(query("dr"));
        let b = slot.issue(query("dre"));
        assert!(b > a);
    }

    #[test]
    fn late_response_for_superseded_request_is_dropped() {
        let mut slot = ResultSlot::new();
        let first = slot.issue(query("dress"));
        let second = slot.issue(query("dresses"));

        assert_eq!(slot.commit(second, Ok(result_with("dresses"))), CommitOutcome::Applied);
        assert_eq!(slot.commit(first, Ok(result_with("dress"))), CommitOutcome::Stale);

        assert_eq!(slot.current(), Some(&result_with("dresses")));
    }

    #[test]
    fn failure_keeps_last_good_and_surfaces_once_idle() {
        let mut slot = ResultSlot::new();
        let ok = slot.issue(query("gold"));
        slot.commit(ok, Ok(result_with("gold")));

        let failing = slot.issue(query("golden"));
        assert!(matches!(slot.view(), SlotView::Searching { previous: Some(_), .. }));

        assert_eq!(slot.commit(failing, Err("timeout".into())), CommitOutcome::Failed);
        match slot.view() {
            SlotView::Failed { message, previous } => {
                assert_eq!(message, "timeout");
                assert_eq!(previous, Some(&result_with("gold")));
            }
            other => panic!("unexpected view {other:?}"),
        }
    }

    #[test]
    fn clear_invalidates_in_flight() {
        let mut slot = ResultSlot::new();
        let token = slot.issue(query("bags"));
        slot.clear();

        assert_eq!(slot.commit(token, Ok(result_with("bags"))), CommitOutcome::Stale);
        assert_eq!(slot.view(), SlotView::Idle);
    }

    #[test]
    fn duplicate_delivery_is_stale() {
        let mut slot = ResultSlot::new();
        let token = slot.issue(query("bags"));
        assert_eq!(slot.commit(token, Ok(SearchResult::empty())), CommitOutcome::Applied);
        assert_eq!(slot.commit(token, Ok(result_with("bags"))), CommitOutcome::Stale);
        assert!(matches!(slot.view(), SlotView::NoResults { .. }));
    }
}
