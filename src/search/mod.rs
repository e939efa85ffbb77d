//! Predictive search: debouncing, request identity, and the result slot.
//!
//! ```text
//! input ─▶ Debouncer ──(quiet interval)──▶ ResultSlot::issue ─▶ RequestToken
//!                                                       ▲
//!                     response(token) ─▶ ResultSlot::commit (stale? drop)
//! ```

pub mod debounce;
pub mod session;
pub mod slot;

pub use debounce::{Debouncer, InputOutcome};
pub use session::SearchSession;
pub use slot::{CommitOutcome, RequestToken, ResultSlot, SlotView};
