//! Worker implementation.
//!
//! [`StorefrontWorker`] services [`WorkerMessage`]s: commerce requests go
//! through the [`CommerceClient`], preference persistence through the
//! [`Storage`] backend. Every failure is turned into a response so the
//! coordinator can react. Nothing escapes as a panic or a dropped message.

use crate::client::{CommerceClient, CommerceRequest};
use crate::domain::error::{Result, StorefrontError};
use crate::domain::{normalize_search_payload, Cart, LineId, MutationPayload, Preferences};
use crate::infrastructure::paths;
use crate::storage::{JsonStorage, PreferencesRecord, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::cart::SubmissionId;
use crate::search::RequestToken;
use std::path::Path;
use tracing::Instrument;

/// Services worker messages against a commerce client and a storage backend.
///
/// # Examples
///
/// ```
/// use futures_executor::block_on;
/// use storefront_core::client::{Catalog, CatalogClient};
/// use storefront_core::worker::{StorefrontWorker, WorkerMessage, WorkerResponse};
///
/// let mut worker = StorefrontWorker::new(CatalogClient::new(Catalog::default()));
/// let response = block_on(worker.handle_message(WorkerMessage::load_cart()));
/// assert!(matches!(response, WorkerResponse::CartLoaded { .. }));
/// ```
pub struct StorefrontWorker<C> {
    /// Commerce API used for search and cart requests.
    client: C,
    /// Absent when running without persistence.
    storage: Option<Box<dyn Storage>>,
}

impl<C: CommerceClient> StorefrontWorker<C> {
    /// Creates a worker without persistence. Preference messages fail with
    /// [`WorkerResponse::Error`].
    #[must_use]
    pub fn new(client: C) -> Self {
        Self { client, storage: None }
    }

    /// Creates a worker persisting preferences as JSON under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn open(client: C, data_dir: &Path) -> Result<Self> {
        let storage: Box<dyn Storage> = Box::new(JsonStorage::new(paths::preferences_file(data_dir))?);
        Ok(Self {
            client,
            storage: Some(storage),
        })
    }

    /// Replaces the storage backend, e.g. with an in-memory one in tests.
    #[must_use]
    pub fn with_storage(mut self, storage: Box<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| StorefrontError::Worker("Storage not initialized".to_string()))
    }

    /// Standardizes logging and error mapping for storage operations.
    fn handle_storage_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    async fn handle_search(&self, token: RequestToken, term: String, limit: u32) -> WorkerResponse {
        let outcome = self
            .client
            .query(CommerceRequest::PredictiveSearch { term, limit })
            .await
            .and_then(|payload| normalize_search_payload(&payload));

        match outcome {
            Ok(results) => {
                tracing::debug!(%token, total = results.total_results, "search completed");
                WorkerResponse::SearchResults { token, results }
            }
            Err(e) => {
                tracing::warn!(%token, error = %e, "search failed");
                WorkerResponse::SearchFailed {
                    token,
                    message: e.to_string(),
                }
            }
        }
    }

    async fn handle_load_cart(&self) -> WorkerResponse {
        let outcome = self
            .client
            .query(CommerceRequest::CartQuery)
            .await
            .and_then(|payload| Cart::from_payload(&payload));

        match outcome {
            Ok(cart) => {
                tracing::debug!(lines = cart.lines.len(), "cart loaded");
                WorkerResponse::CartLoaded { cart }
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart load failed");
                WorkerResponse::Error {
                    message: format!("load cart: {e}"),
                }
            }
        }
    }

    async fn handle_mutation(
        &self,
        submission: SubmissionId,
        line_id: LineId,
        request: CommerceRequest,
    ) -> WorkerResponse {
        let outcome = self
            .client
            .query(request)
            .await
            .and_then(|payload| MutationPayload::from_payload(&payload))
            .and_then(MutationPayload::into_cart);

        match outcome {
            Ok(cart) => {
                tracing::debug!(%submission, line = %line_id, "cart mutation applied");
                WorkerResponse::CartMutated {
                    submission,
                    line_id,
                    cart,
                }
            }
            Err(e) => {
                tracing::warn!(%submission, line = %line_id, error = %e, "cart mutation rejected");
                let message = match e {
                    StorefrontError::Rejected(message) => message,
                    other => other.to_string(),
                };
                WorkerResponse::CartMutationRejected {
                    submission,
                    line_id,
                    message,
                }
            }
        }
    }

    fn handle_load_preferences(&mut self) -> WorkerResponse {
        Self::handle_storage_result(
            "load preferences",
            self.get_storage().and_then(|storage| storage.load_preferences()),
            |record| WorkerResponse::PreferencesLoaded {
                preferences: record.into_preferences(),
            },
        )
    }

    fn handle_save_preferences(&mut self, preferences: &Preferences) -> WorkerResponse {
        let record = PreferencesRecord::from_preferences(preferences);

        Self::handle_storage_result(
            "save preferences",
            self.get_storage().and_then(|storage| storage.save_preferences(&record)),
            |()| WorkerResponse::PreferencesSaved,
        )
    }

    /// Rebuilds the sender's OpenTelemetry context from the message.
    fn parent_context(message: &WorkerMessage) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

        Some(opentelemetry::Context::current().with_remote_span_context(span_context))
    }

    /// Processes one message and returns its response.
    ///
    /// The work runs inside a `worker_handle_message` span parented to the
    /// sender's trace context, when the message carries one.
    ///
    /// | Message | Success | Failure |
    /// |---------|---------|---------|
    /// | `PredictiveSearch` | `SearchResults` | `SearchFailed` |
    /// | `LoadCart` | `CartLoaded` | `Error` |
    /// | `UpdateCartLine`, `RemoveCartLine` | `CartMutated` | `CartMutationRejected` |
    /// | `LoadPreferences` | `PreferencesLoaded` | `Error` |
    /// | `SavePreferences` | `PreferencesSaved` | `Error` |
    ///
    /// Responses echo the request's token or submission id so the caller can
    /// discard stale ones.
    pub async fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        if let Some(parent) = Self::parent_context(&message) {
            span.set_parent(parent);
        }

        self.dispatch(message).instrument(span).await
    }

    async fn dispatch(&mut self, message: WorkerMessage) -> WorkerResponse {
        match message {
            WorkerMessage::PredictiveSearch { token, term, limit, .. } => {
                self.handle_search(token, term, limit).await
            }

            WorkerMessage::LoadCart { .. } => self.handle_load_cart().await,

            WorkerMessage::UpdateCartLine {
                submission,
                line_id,
                quantity,
                ..
            } => {
                let request = CommerceRequest::CartLinesUpdate {
                    line_id: line_id.clone(),
                    quantity,
                };
                self.handle_mutation(submission, line_id, request).await
            }

            WorkerMessage::RemoveCartLine { submission, line_id, .. } => {
                let request = CommerceRequest::CartLinesRemove {
                    line_ids: vec![line_id.clone()],
                };
                self.handle_mutation(submission, line_id, request).await
            }

            WorkerMessage::LoadPreferences { .. } => self.handle_load_preferences(),

            WorkerMessage::SavePreferences { preferences, .. } => self.handle_save_preferences(&preferences),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Catalog, CatalogClient};
    use crate::domain::{CartLine, Money, SearchHit};
    use crate::cart::{LineEdit, OptimisticCart};
    use futures_executor::block_on;
    use std::time::Instant;

    fn catalog() -> Catalog {
        Catalog {
            products: vec![SearchHit {
                id: "p1".into(),
                title: "Pearl Earrings".into(),
                handle: "pearl-earrings".into(),
                price: Some(Money::from_major(240)),
            }],
            cart: Cart {
                id: "cart-1".into(),
                lines: vec![CartLine {
                    id: LineId::new("l1"),
                    merchandise_id: "v1".into(),
                    title: "Pearl Earrings".into(),
                    quantity: 1,
                    unit_price: Money::from_major(240),
                    quantity_available: Some(2),
                }],
                currency_code: "SAR".into(),
                ..Cart::default()
            },
            ..Catalog::default()
        }
    }

    fn submission() -> SubmissionId {
        let mut cart = OptimisticCart::from_cart(catalog().cart);
        cart.submit(&LineId::new("l1"), LineEdit::Quantity(2), Instant::now()).unwrap()
    }

    #[test]
    fn search_echoes_token() {
        let mut worker = StorefrontWorker::new(CatalogClient::new(catalog()));
        let token: RequestToken = serde_json::from_str("7").unwrap();

        let response = block_on(worker.handle_message(WorkerMessage::predictive_search(token, "pearl".into(), 6)));
        match response {
            WorkerResponse::SearchResults { token: echoed, results } => {
                assert_eq!(echoed, token);
                assert_eq!(results.products.len(), 1);
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn transport_failure_becomes_search_failed() {
        let client = CatalogClient::new(catalog());
        client.set_offline(true);
        let mut worker = StorefrontWorker::new(client);
        let token: RequestToken = serde_json::from_str("1").unwrap();

        let response = block_on(worker.handle_message(WorkerMessage::predictive_search(token, "pearl".into(), 6)));
        assert!(matches!(response, WorkerResponse::SearchFailed { .. }));
    }

    #[test]
    fn rejection_carries_user_message() {
        let mut worker = StorefrontWorker::new(CatalogClient::new(catalog()));
        let id = submission();

        let response = block_on(worker.handle_message(WorkerMessage::update_cart_line(id, LineId::new("l1"), 9)));
        match response {
            WorkerResponse::CartMutationRejected { submission, message, .. } => {
                assert_eq!(submission, id);
                assert!(message.starts_with("Only 2"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn preferences_require_storage() {
        let mut worker = StorefrontWorker::new(CatalogClient::new(catalog()));
        let response = block_on(worker.handle_message(WorkerMessage::load_preferences()));
        assert!(matches!(response, WorkerResponse::Error { .. }));
    }

    #[test]
    fn preferences_round_trip_through_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = StorefrontWorker::open(CatalogClient::new(catalog()), dir.path()).unwrap();

        let preferences = Preferences {
            wishlist: vec!["p1".into()],
            promo_banner_closed: true,
            reduced_motion: false,
        };
        let saved = block_on(worker.handle_message(WorkerMessage::save_preferences(preferences.clone())));
        assert_eq!(saved, WorkerResponse::PreferencesSaved);

        let loaded = block_on(worker.handle_message(WorkerMessage::load_preferences()));
        assert_eq!(loaded, WorkerResponse::PreferencesLoaded { preferences });
    }
}
