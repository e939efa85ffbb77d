//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only entry point that mutates [`AppState`]. It
//! pattern-matches the event, applies it, and returns whether the view needs
//! a re-render together with the side effects to run.
//!
//! Time never comes from a clock here: events that depend on it carry `now`.
//! When the earliest pending deadline (debounced search, promo rotation)
//! changes, an [`Action::ScheduleWake`] is appended so the runtime can send
//! an [`Event::Tick`] at the right moment.
//!
//! # Example
//!
//! ```rust
//! use storefront_core::{handle_event, AppState, Event, Settings};
//! use storefront_core::store::{Overlay, UiAction};
//! use std::time::Instant;
//!
//! let mut state = AppState::new(Settings::default());
//! let now = Instant::now();
//! handle_event(&mut state, &Event::Ui { action: UiAction::Open(Overlay::Search), now })?;
//! let (render, actions) = handle_event(&mut state, &Event::SearchInput { term: "dress".into(), now })?;
//! assert!(render);
//! assert_eq!(actions.len(), 1); // ScheduleWake for the quiet interval
//! # Ok::<(), storefront_core::StorefrontError>(())
//! ```

use crate::app::{Action, AppState};
use crate::cart::{LineEdit, MutationOutcome, ResolveOutcome};
use crate::domain::error::Result;
use crate::domain::{HitKind, LineId, Preferences};
use crate::search::CommitOutcome;
use crate::store::{Overlay, UiAction};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Cart line controls as the shopper sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineControl {
    Increment,
    /// Disabled at quantity one.
    Decrement,
    Remove,
    /// Typed quantity. Zero removes the line.
    SetQuantity(u32),
}

/// Events from the shopper, the runtime, or the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The page finished loading. Restores preferences and fetches the cart.
    Started { now: Instant },

    /// The search input's value changed. Ignored while search is closed.
    SearchInput { term: String, now: Instant },

    /// Enter in the search input. Fires the pending query now, or retries a
    /// failed one.
    SubmitSearch,

    /// A wake-up requested by [`Action::ScheduleWake`] arrived.
    Tick { now: Instant },

    /// A result was chosen. Closes search and navigates to it.
    SelectSearchHit { kind: HitKind, handle: String },

    /// A query suggestion was chosen. Replaces the term and searches at once.
    SelectSuggestion { text: String, now: Instant },

    /// Closes whatever overlay is open.
    Escape,

    /// A direct UI store action (overlay toggles, menu, promo, wishlist,
    /// filters, motion preference).
    Ui { action: UiAction, now: Instant },

    CartEdit {
        line_id: LineId,
        control: LineControl,
        now: Instant,
    },

    DismissCartErrors,

    /// Refetches the server cart, e.g. after another tab changed it.
    LoadCart,

    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns `(render, actions)`. `render` is `false` when nothing visible
/// changed, so the runtime can skip a frame.
///
/// # Errors
///
/// Returns an error if a cart edit reaches the optimistic cart for a line it
/// does not hold. Edits for lines that are not displayed are filtered out
/// before that point, so in practice this indicates a bug.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let (render, mut actions) = apply_event(state, event)?;
    actions.extend(state.wake_action());

    Ok((render, actions))
}

#[allow(clippy::too_many_lines)]
fn apply_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::Started { now } => {
            tracing::debug!("storefront started, restoring preferences and cart");
            state.sync_promo_timer(Some(*now), false);
            Ok((
                true,
                vec![
                    Action::PostToWorker(WorkerMessage::load_preferences()),
                    Action::PostToWorker(WorkerMessage::load_cart()),
                ],
            ))
        }
        Event::SearchInput { term, now } => {
            if !state.ui().search_open {
                tracing::debug!("search input while search is closed, ignoring");
                return Ok((false, vec![]));
            }

            let outcome = state.search.input(term, *now);
            tracing::trace!(outcome = ?outcome, "search input recorded");
            Ok((true, vec![]))
        }
        Event::SubmitSearch => {
            if !state.ui().search_open {
                return Ok((false, vec![]));
            }

            Ok(state.search.submit().map_or_else(
                || {
                    tracing::debug!("nothing to submit");
                    (false, vec![])
                },
                |(token, query)| {
                    (
                        true,
                        vec![Action::PostToWorker(WorkerMessage::predictive_search(
                            token, query.term, query.limit,
                        ))],
                    )
                },
            ))
        }
        Event::Tick { now } => {
            let mut render = false;
            let mut actions = vec![];

            if let Some((token, query)) = state.search.poll(*now) {
                tracing::debug!(%token, term = %query.term, "quiet interval elapsed, searching");
                render = true;
                actions.push(Action::PostToWorker(WorkerMessage::predictive_search(
                    token, query.term, query.limit,
                )));
            }

            if state.rotate_promo_if_due(*now) {
                render = true;
            }

            Ok((render, actions))
        }
        Event::SelectSearchHit { kind, handle } => {
            let path = kind.path(handle);
            tracing::debug!(path = %path, "search hit selected");

            let (_, mut actions) = state.dispatch(&UiAction::Close(Overlay::Search), None, true);
            actions.push(Action::Navigate { path });
            Ok((true, actions))
        }
        Event::SelectSuggestion { text, now } => {
            if !state.ui().search_open {
                return Ok((false, vec![]));
            }

            state.search.input(text, *now);
            let actions = state
                .search
                .submit()
                .map(|(token, query)| {
                    Action::PostToWorker(WorkerMessage::predictive_search(token, query.term, query.limit))
                })
                .into_iter()
                .collect();
            Ok((true, actions))
        }
        Event::Escape => Ok(state.dispatch(&UiAction::CloseAll, None, true)),
        Event::Ui { action, now } => Ok(state.dispatch(action, Some(*now), true)),
        Event::CartEdit { line_id, control, now } => handle_cart_edit(state, line_id, *control, *now),
        Event::DismissCartErrors => {
            let had_errors = !state.cart.orphan_errors().is_empty()
                || state.cart.display_lines().iter().any(|line| line.error.is_some());
            state.cart.dismiss_errors();
            Ok((had_errors, vec![]))
        }
        Event::LoadCart => Ok((false, vec![Action::PostToWorker(WorkerMessage::load_cart())])),
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

/// Maps a line control to an edit, or `None` when the control is disabled.
fn edit_for(control: LineControl, current: u32, available: Option<u32>) -> Option<LineEdit> {
    match control {
        LineControl::Increment => {
            if available.is_some_and(|available| current >= available) {
                None
            } else {
                Some(LineEdit::Quantity(current.saturating_add(1)))
            }
        }
        LineControl::Decrement => (current > 1).then(|| LineEdit::Quantity(current - 1)),
        LineControl::Remove | LineControl::SetQuantity(0) => Some(LineEdit::Remove),
        LineControl::SetQuantity(quantity) => (quantity != current).then_some(LineEdit::Quantity(quantity)),
    }
}

fn handle_cart_edit(
    state: &mut AppState,
    line_id: &LineId,
    control: LineControl,
    now: Instant,
) -> Result<(bool, Vec<Action>)> {
    let Some(line) = state.cart.entry(line_id).and_then(|entry| entry.displayed()) else {
        tracing::debug!(line_id = %line_id, "edit for a line that is not displayed, ignoring");
        return Ok((false, vec![]));
    };

    let Some(edit) = edit_for(control, line.quantity, line.quantity_available) else {
        tracing::debug!(line_id = %line_id, control = ?control, "control disabled, ignoring");
        return Ok((false, vec![]));
    };

    let submission = state.cart.submit(line_id, edit, now)?;
    let message = match edit {
        LineEdit::Remove | LineEdit::Quantity(0) => WorkerMessage::remove_cart_line(submission, line_id.clone()),
        LineEdit::Quantity(quantity) => WorkerMessage::update_cart_line(submission, line_id.clone(), quantity),
    };

    Ok((true, vec![Action::PostToWorker(message)]))
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::SearchResults { token, results } => {
            let outcome = state.search.commit(*token, Ok(results.clone()));
            (outcome != CommitOutcome::Stale, vec![])
        }
        WorkerResponse::SearchFailed { token, message } => {
            let outcome = state.search.commit(*token, Err(message.clone()));
            (outcome != CommitOutcome::Stale, vec![])
        }
        WorkerResponse::CartLoaded { cart } => {
            tracing::debug!(lines = cart.lines.len(), "server cart loaded");
            state.cart.reconcile(cart.clone());
            (true, vec![])
        }
        WorkerResponse::CartMutated {
            submission,
            line_id,
            cart,
        } => {
            let outcome = state
                .cart
                .resolve(line_id, *submission, MutationOutcome::Applied(cart.clone()));
            (outcome != ResolveOutcome::Ignored, vec![])
        }
        WorkerResponse::CartMutationRejected {
            submission,
            line_id,
            message,
        } => {
            let outcome = state
                .cart
                .resolve(line_id, *submission, MutationOutcome::Rejected(message.clone()));
            (outcome != ResolveOutcome::Ignored, vec![])
        }
        WorkerResponse::PreferencesLoaded { preferences } => restore_preferences(state, preferences),
        WorkerResponse::PreferencesSaved => (false, vec![]),
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            (false, vec![])
        }
    }
}

/// Applies persisted preferences without echoing them back as a save.
fn restore_preferences(state: &mut AppState, preferences: &Preferences) -> (bool, Vec<Action>) {
    let mut restore = vec![
        UiAction::SetWishlist(preferences.wishlist.clone()),
        UiAction::SetReducedMotion(preferences.reduced_motion),
    ];
    if preferences.promo_banner_closed {
        restore.push(UiAction::ClosePromoBanner);
    }

    let mut render = false;
    let mut actions = vec![];
    for action in &restore {
        let (changed, mut side_effects) = state.dispatch(action, None, false);
        render |= changed;
        actions.append(&mut side_effects);
    }

    tracing::debug!(
        wishlist = preferences.wishlist.len(),
        changed = render,
        "preferences restored"
    );
    (render, actions)
}
