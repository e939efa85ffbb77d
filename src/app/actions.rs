//! Side effects requested by the event handler.
//!
//! The handler never performs I/O. It returns a `Vec<Action>` alongside its
//! render flag and the runtime executes them in order.

use crate::worker::WorkerMessage;
use std::time::Instant;

/// Commands for the runtime hosting the storefront core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background worker. Its response comes back as
    /// [`Event::WorkerResponse`](super::Event::WorkerResponse).
    PostToWorker(WorkerMessage),

    /// Navigates the page to a storefront path.
    Navigate { path: String },

    /// Asks for an [`Event::Tick`](super::Event::Tick) at or after `at`.
    ///
    /// Supersedes any earlier request; only the latest wake-up matters.
    ScheduleWake { at: Instant },

    /// Locks or unlocks page scrolling behind overlays.
    SetScrollLock(bool),
}
