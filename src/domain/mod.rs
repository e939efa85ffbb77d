//! Core domain types shared by every layer.
//!
//! - [`error`]: crate error type and `Result` alias
//! - [`money`]: fixed-point amounts
//! - [`search`]: predictive search queries and normalized results
//! - [`cart`]: cart lines, carts and mutation payloads
//! - [`preferences`]: persisted shopper preferences

pub mod cart;
pub mod error;
pub mod money;
pub mod preferences;
pub mod search;

pub use cart::{Cart, CartLine, DiscountCode, LineId, MutationPayload, UserError};
pub use error::{Result, StorefrontError};
pub use money::Money;
pub use preferences::Preferences;
pub use search::{normalize_search_payload, HitKind, QuerySuggestion, SearchHit, SearchQuery, SearchResult};
