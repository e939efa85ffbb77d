//! Cart drawer state: optimistic line edits and derived totals.

pub mod optimistic;
pub mod summary;

pub use optimistic::{
    DisplayLine, LineEdit, LineEntry, MutationOutcome, OptimisticCart, ResolveOutcome, SubmissionId,
};
pub use summary::{CartSummary, FreeShippingProgress};
