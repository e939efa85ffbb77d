//! Asynchronous side of the core.
//!
//! The coordinator is synchronous and performs no I/O. Anything that talks to
//! the commerce API or the disk is expressed as a [`WorkerMessage`] and
//! answered with a [`WorkerResponse`], which re-enters the coordinator as an
//! event.
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: worker implementation and message processing

pub mod handler;
pub mod messages;

pub use handler::StorefrontWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
