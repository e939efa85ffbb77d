//! Worker message types.
//!
//! The coordinator never performs I/O. It posts [`WorkerMessage`]s describing
//! commerce requests and preference persistence, and receives
//! [`WorkerResponse`]s back as events. Every message carries the trace context
//! of the span that produced it so worker spans join the same trace.

use crate::cart::SubmissionId;
use crate::domain::{Cart, LineId, Preferences, SearchResult};
use crate::search::RequestToken;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// context is otherwise invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(trace_id = %trace_id, parent_span_id = %parent_span_id, "capturing trace context");

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    predictive_search(PredictiveSearch { token: RequestToken, term: String, limit: u32 }),
    load_cart(LoadCart {}),
    update_cart_line(UpdateCartLine { submission: SubmissionId, line_id: LineId, quantity: u32 }),
    remove_cart_line(RemoveCartLine { submission: SubmissionId, line_id: LineId }),
    load_preferences(LoadPreferences {}),
    save_preferences(SavePreferences { preferences: Preferences }),
}

/// Requests from the coordinator to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Run a predictive search. The token comes back with the result.
    PredictiveSearch {
        token: RequestToken,
        term: String,
        limit: u32,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the current server cart.
    LoadCart {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Set a line's quantity.
    UpdateCartLine {
        submission: SubmissionId,
        line_id: LineId,
        quantity: u32,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    RemoveCartLine {
        submission: SubmissionId,
        line_id: LineId,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Restore persisted preferences.
    LoadPreferences {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    SavePreferences {
        preferences: Preferences,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    pub(crate) const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::PredictiveSearch { trace_context, .. }
            | Self::LoadCart { trace_context }
            | Self::UpdateCartLine { trace_context, .. }
            | Self::RemoveCartLine { trace_context, .. }
            | Self::LoadPreferences { trace_context }
            | Self::SavePreferences { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short message name for span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PredictiveSearch { .. } => "predictive_search",
            Self::LoadCart { .. } => "load_cart",
            Self::UpdateCartLine { .. } => "update_cart_line",
            Self::RemoveCartLine { .. } => "remove_cart_line",
            Self::LoadPreferences { .. } => "load_preferences",
            Self::SavePreferences { .. } => "save_preferences",
        }
    }
}

/// Responses from the worker to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Normalized results for the request identified by `token`.
    SearchResults { token: RequestToken, results: SearchResult },

    /// The search request failed at the transport or decode level.
    SearchFailed { token: RequestToken, message: String },

    CartLoaded { cart: Cart },

    /// A line edit was accepted; `cart` is the authoritative cart after it.
    CartMutated {
        submission: SubmissionId,
        line_id: LineId,
        cart: Cart,
    },

    /// A line edit was rejected or could not be delivered.
    CartMutationRejected {
        submission: SubmissionId,
        line_id: LineId,
        message: String,
    },

    PreferencesLoaded { preferences: Preferences },

    PreferencesSaved,

    /// An operation with no request-specific response failed.
    Error { message: String },
}
