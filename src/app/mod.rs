//! Application layer coordinating state, events, and actions.
//!
//! Sits between the runtime hosting the storefront (page glue, the replay
//! driver) and the search, store, cart and worker layers.
//!
//! ```text
//! Shopper input → Event → handle_event → state mutations → Actions → runtime
//!                   ↑                                          ↓
//!                   └──────────── WorkerResponse ──────────────┘
//! ```
//!
//! - [`actions`]: side effects emitted by the handler
//! - [`handler`]: event processing
//! - [`state`]: state container and view model computation

pub mod actions;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event, LineControl};
pub use state::{AppState, PromoMessage, Settings};
