//! In-memory commerce client backed by a catalog fixture.
//!
//! Answers predictive search by fuzzy-matching titles with the skim algorithm
//! and applies cart mutations to an in-memory cart, producing the same payload
//! shapes the hosted API does (`{"cart": ..., "userErrors": [...]}`).

use super::{CommerceClient, CommerceRequest};
use crate::domain::error::{Result, StorefrontError};
use crate::domain::{Cart, LineId, QuerySuggestion, SearchHit, UserError};
use futures_util::future::BoxFuture;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Fixture contents: searchable documents plus a starting cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<SearchHit>,
    #[serde(default)]
    pub collections: Vec<SearchHit>,
    #[serde(default)]
    pub articles: Vec<SearchHit>,
    #[serde(default)]
    pub pages: Vec<SearchHit>,
    #[serde(default)]
    pub queries: Vec<QuerySuggestion>,
    #[serde(default)]
    pub cart: Cart,
}

impl Catalog {
    /// Loads a catalog fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| StorefrontError::Config(format!("invalid catalog {}: {e}", path.display())))
    }
}

/// [`CommerceClient`] over an in-memory [`Catalog`].
#[derive(Debug)]
pub struct CatalogClient {
    catalog: Catalog,
    cart: Mutex<Cart>,
    offline: AtomicBool,
}

impl CatalogClient {
    #[must_use]
    pub fn new(mut catalog: Catalog) -> Self {
        let cart = std::mem::take(&mut catalog.cart);
        Self {
            catalog,
            cart: Mutex::new(cart),
            offline: AtomicBool::new(false),
        }
    }

    /// Simulates a network outage: every request fails at the transport level.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn predictive_search(&self, term: &str, limit: u32) -> serde_json::Value {
        let tokens: Vec<String> = term.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return serde_json::Value::Null;
        }

        let matcher = SkimMatcherV2::default();
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        let score = |text: &str| -> Option<i64> {
            let lowered = text.to_lowercase();
            tokens
                .iter()
                .map(|token| matcher.fuzzy_match(&lowered, token))
                .sum::<Option<i64>>()
        };

        let rank = |hits: &[SearchHit]| -> Vec<SearchHit> {
            let mut scored: Vec<(i64, &SearchHit)> =
                hits.iter().filter_map(|hit| score(&hit.title).map(|s| (s, hit))).collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            scored.into_iter().take(limit).map(|(_, hit)| hit.clone()).collect()
        };

        let mut queries: Vec<(i64, &QuerySuggestion)> = self
            .catalog
            .queries
            .iter()
            .filter_map(|q| score(&q.text).map(|s| (s, q)))
            .collect();
        queries.sort_by(|a, b| b.0.cmp(&a.0));
        let queries: Vec<QuerySuggestion> = queries.into_iter().take(limit).map(|(_, q)| q.clone()).collect();

        json!({
            "products": rank(&self.catalog.products),
            "collections": rank(&self.catalog.collections),
            "articles": rank(&self.catalog.articles),
            "pages": rank(&self.catalog.pages),
            "queries": queries,
        })
    }

    fn with_cart<F>(&self, mutate: F) -> Result<serde_json::Value>
    where
        F: FnOnce(&mut Cart) -> Vec<UserError>,
    {
        let mut cart = self
            .cart
            .lock()
            .map_err(|e| StorefrontError::Client(format!("cart lock poisoned: {e}")))?;

        let user_errors = mutate(&mut cart);
        if !user_errors.is_empty() {
            tracing::debug!(errors = user_errors.len(), "cart mutation rejected");
        }

        Ok(json!({ "cart": *cart, "userErrors": user_errors }))
    }

    fn update_line(cart: &mut Cart, line_id: &LineId, quantity: u32) -> Vec<UserError> {
        let Some(index) = cart.lines.iter().position(|line| &line.id == line_id) else {
            return vec![missing_line(line_id)];
        };

        if quantity == 0 {
            cart.lines.remove(index);
            return vec![];
        }

        let line = &mut cart.lines[index];
        if let Some(available) = line.quantity_available {
            if quantity > available {
                return vec![UserError {
                    message: format!("Only {available} of {} available", line.title),
                }];
            }
        }

        line.quantity = quantity;
        vec![]
    }

    fn remove_lines(cart: &mut Cart, line_ids: &[LineId]) -> Vec<UserError> {
        let missing: Vec<UserError> = line_ids
            .iter()
            .filter(|id| cart.line(id).is_none())
            .map(missing_line)
            .collect();
        if !missing.is_empty() {
            return missing;
        }

        cart.lines.retain(|line| !line_ids.contains(&line.id));
        vec![]
    }
}

fn missing_line(line_id: &LineId) -> UserError {
    UserError {
        message: format!("The merchandise line with id {line_id} does not exist."),
    }
}

impl CommerceClient for CatalogClient {
    fn query(&self, request: CommerceRequest) -> BoxFuture<'_, Result<serde_json::Value>> {
        let _span = tracing::debug_span!("catalog_query", operation = request.operation()).entered();

        if self.offline.load(Ordering::SeqCst) {
            tracing::debug!("catalog offline");
            return Box::pin(std::future::ready(Err(StorefrontError::Client(
                "network unavailable".to_string(),
            ))));
        }

        let result = match request {
            CommerceRequest::PredictiveSearch { term, limit } => Ok(self.predictive_search(&term, limit)),
            CommerceRequest::CartQuery => self.with_cart(|_| vec![]),
            CommerceRequest::CartLinesUpdate { line_id, quantity } => {
                self.with_cart(|cart| Self::update_line(cart, &line_id, quantity))
            }
            CommerceRequest::CartLinesRemove { line_ids } => {
                self.with_cart(|cart| Self::remove_lines(cart, &line_ids))
            }
        };

        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{normalize_search_payload, CartLine, Money, MutationPayload};
    use futures_executor::block_on;

    fn hit(id: &str, title: &str) -> SearchHit {
        SearchHit {
            id: id.into(),
            title: title.into(),
            handle: title.to_lowercase().replace(' ', "-"),
            price: None,
        }
    }

    fn client() -> CatalogClient {
        CatalogClient::new(Catalog {
            products: vec![
                hit("p1", "Silk Evening Dress"),
                hit("p2", "Linen Day Dress"),
                hit("p3", "Gold Cuff"),
                hit("p4", "Dressage Boots"),
            ],
            collections: vec![hit("c1", "Dresses")],
            queries: vec![QuerySuggestion { text: "dresses".into() }],
            cart: Cart {
                id: "cart".into(),
                lines: vec![CartLine {
                    id: LineId::new("l1"),
                    merchandise_id: "v1".into(),
                    title: "Gold Cuff".into(),
                    quantity: 1,
                    unit_price: Money::from_major(800),
                    quantity_available: Some(3),
                }],
                currency_code: "SAR".into(),
                ..Cart::default()
            },
            ..Catalog::default()
        })
    }

    #[test]
    fn search_applies_limit_per_bucket() {
        let c = client();
        let payload = block_on(c.query(CommerceRequest::PredictiveSearch {
            term: "dress".into(),
            limit: 2,
        }))
        .unwrap();
        let result = normalize_search_payload(&payload).unwrap();

        assert_eq!(result.products.len(), 2);
        assert_eq!(result.collections.len(), 1);
        assert!(result.products.iter().all(|p| p.title.to_lowercase().contains("dress")));
    }

    #[test]
    fn empty_term_returns_null() {
        let c = client();
        let payload = block_on(c.query(CommerceRequest::PredictiveSearch {
            term: "  ".into(),
            limit: 6,
        }))
        .unwrap();
        assert!(payload.is_null());
    }

    #[test]
    fn update_beyond_stock_is_rejected() {
        let c = client();
        let payload = block_on(c.query(CommerceRequest::CartLinesUpdate {
            line_id: LineId::new("l1"),
            quantity: 5,
        }))
        .unwrap();
        let err = MutationPayload::from_payload(&payload).unwrap().into_cart().unwrap_err();
        assert!(matches!(err, StorefrontError::Rejected(msg) if msg.contains("Only 3")));
    }

    #[test]
    fn update_and_remove() {
        let c = client();
        let payload = block_on(c.query(CommerceRequest::CartLinesUpdate {
            line_id: LineId::new("l1"),
            quantity: 2,
        }))
        .unwrap();
        let cart = MutationPayload::from_payload(&payload).unwrap().into_cart().unwrap();
        assert_eq!(cart.lines[0].quantity, 2);

        let payload = block_on(c.query(CommerceRequest::CartLinesRemove {
            line_ids: vec![LineId::new("l1")],
        }))
        .unwrap();
        let cart = MutationPayload::from_payload(&payload).unwrap().into_cart().unwrap();
        assert!(cart.lines.is_empty());
    }

    #[test]
    fn offline_fails_at_transport() {
        let c = client();
        c.set_offline(true);
        let err = block_on(c.query(CommerceRequest::CartQuery)).unwrap_err();
        assert!(matches!(err, StorefrontError::Client(_)));
    }
}
