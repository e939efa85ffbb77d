//! Predictive search query and result models.
//!
//! A [`SearchQuery`] is created each time the debouncer fires and lives only
//! until the next one supersedes it. A [`SearchResult`] is the normalized form
//! of the commerce API's predictive-search payload: five buckets plus a
//! precomputed total.

use crate::domain::error::{Result, StorefrontError};
use crate::domain::money::Money;
use serde::{Deserialize, Serialize};

/// A single remote lookup request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search term as typed, trimmed.
    pub term: String,

    /// Maximum hits per result bucket.
    pub limit: u32,
}

/// Which result bucket a hit came from.
///
/// Determines the storefront path a selected hit navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitKind {
    Product,
    Collection,
    Article,
    Page,
}

impl HitKind {
    /// Storefront path for a hit with the given handle.
    #[must_use]
    pub fn path(self, handle: &str) -> String {
        match self {
            Self::Product => format!("/products/{handle}"),
            Self::Collection => format!("/collections/{handle}"),
            Self::Article => format!("/journal/{handle}"),
            Self::Page => format!("/pages/{handle}"),
        }
    }
}

/// One entry in a result bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub handle: String,

    /// Only products carry a price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
}

/// A suggested query completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySuggestion {
    pub text: String,
}

/// Normalized predictive-search results.
///
/// `total_results` always equals the sum of the bucket lengths; construct
/// through [`SearchResult::from_buckets`] or [`normalize_search_payload`] to
/// keep that true.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub products: Vec<SearchHit>,
    pub collections: Vec<SearchHit>,
    pub articles: Vec<SearchHit>,
    pub pages: Vec<SearchHit>,
    pub queries: Vec<QuerySuggestion>,
    pub total_results: usize,
}

impl SearchResult {
    /// The canonical empty result.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_buckets(
        products: Vec<SearchHit>,
        collections: Vec<SearchHit>,
        articles: Vec<SearchHit>,
        pages: Vec<SearchHit>,
        queries: Vec<QuerySuggestion>,
    ) -> Self {
        let total_results =
            products.len() + collections.len() + articles.len() + pages.len() + queries.len();

        if total_results == 0 {
            return Self::empty();
        }

        Self {
            products,
            collections,
            articles,
            pages,
            queries,
            total_results,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_results == 0
    }

    /// Iterates the navigable buckets with their kind.
    pub fn buckets(&self) -> impl Iterator<Item = (HitKind, &[SearchHit])> {
        [
            (HitKind::Product, self.products.as_slice()),
            (HitKind::Collection, self.collections.as_slice()),
            (HitKind::Article, self.articles.as_slice()),
            (HitKind::Page, self.pages.as_slice()),
        ]
        .into_iter()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPredictiveSearch {
    #[serde(default)]
    products: Vec<SearchHit>,
    #[serde(default)]
    collections: Vec<SearchHit>,
    #[serde(default)]
    articles: Vec<SearchHit>,
    #[serde(default)]
    pages: Vec<SearchHit>,
    #[serde(default)]
    queries: Vec<QuerySuggestion>,
}

/// Normalizes a predictive-search payload into a [`SearchResult`].
///
/// A `null` payload (what the API returns for an empty term) and a payload
/// with every bucket empty both normalize to [`SearchResult::empty`]. Missing
/// buckets are treated as empty.
///
/// # Errors
///
/// Returns [`StorefrontError::Decode`] if a bucket has the wrong shape.
pub fn normalize_search_payload(payload: &serde_json::Value) -> Result<SearchResult> {
    if payload.is_null() {
        return Ok(SearchResult::empty());
    }

    let raw: RawPredictiveSearch = serde_json::from_value(payload.clone())
        .map_err(|e| StorefrontError::Decode(format!("predictive search payload: {e}")))?;

    Ok(SearchResult::from_buckets(
        raw.products,
        raw.collections,
        raw.articles,
        raw.pages,
        raw.queries,
    ))
}
