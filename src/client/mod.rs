//! Commerce API client seam.
//!
//! The core never speaks HTTP or GraphQL. It hands a [`CommerceRequest`] to a
//! [`CommerceClient`] and gets back an opaque JSON payload, which the domain
//! layer normalizes. [`CatalogClient`] is an in-memory implementation backed
//! by a JSON fixture, used by the replay binary and the tests.

pub mod catalog;

pub use catalog::{Catalog, CatalogClient};

use crate::domain::error::Result;
use crate::domain::LineId;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Operations the core asks of the commerce API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CommerceRequest {
    /// Predictive search; `limit` applies to each result bucket.
    PredictiveSearch { term: String, limit: u32 },

    /// Fetch the current cart.
    CartQuery,

    /// Set a line's quantity. Zero removes the line.
    CartLinesUpdate { line_id: LineId, quantity: u32 },

    CartLinesRemove { line_ids: Vec<LineId> },
}

impl CommerceRequest {
    /// Short operation name for logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::PredictiveSearch { .. } => "predictive_search",
            Self::CartQuery => "cart_query",
            Self::CartLinesUpdate { .. } => "cart_lines_update",
            Self::CartLinesRemove { .. } => "cart_lines_remove",
        }
    }
}

/// Opaque asynchronous request/response against the commerce API.
///
/// Implementations report transport failures as
/// [`StorefrontError::Client`](crate::StorefrontError::Client). API-level
/// rejections travel inside the payload (`userErrors`).
pub trait CommerceClient: Send {
    fn query(&self, request: CommerceRequest) -> BoxFuture<'_, Result<serde_json::Value>>;
}

impl<C: CommerceClient + Sync + ?Sized> CommerceClient for &C {
    fn query(&self, request: CommerceRequest) -> BoxFuture<'_, Result<serde_json::Value>> {
        (**self).query(request)
    }
}

impl<C: CommerceClient + ?Sized> CommerceClient for Box<C> {
    fn query(&self, request: CommerceRequest) -> BoxFuture<'_, Result<serde_json::Value>> {
        (**self).query(request)
    }
}
