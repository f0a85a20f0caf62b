//! Worker message types for fetch requests and their responses.
//!
//! Every request carries the [`FetchTicket`] it was issued under and every response echoes
//! it back, so the navigator can drop responses that arrive after a newer request. Requests
//! also carry the OpenTelemetry context of the span that issued them, keeping worker spans
//! in the same trace.

use crate::app::fetcher::FetchTicket;
use crate::domain::{FetchErrorKind, RankingItem};
use crate::service::RankingRequest;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span IDs of the active span.
    ///
    /// Returns `None` when no valid OpenTelemetry span is active, e.g. when tracing was
    /// never initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Messages sent from the navigator to a fetch worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch one ranked list.
    FetchRankings {
        /// Epoch the request was issued under.
        ticket: FetchTicket,

        /// Wire request for the data service.
        request: RankingRequest,

        /// Trace context for linking spans across threads.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Creates a `FetchRankings` message with the current trace context.
    #[must_use]
    pub fn fetch_rankings(ticket: FetchTicket, request: RankingRequest) -> Self {
        Self::FetchRankings {
            ticket,
            request,
            trace_context: TraceContext::from_current(),
        }
    }

    #[must_use]
    pub const fn ticket(&self) -> FetchTicket {
        match self {
            Self::FetchRankings { ticket, .. } => *ticket,
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchRankings { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from a fetch worker back to the navigator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Rows were received and normalized. May be empty.
    RankingsLoaded {
        ticket: FetchTicket,
        items: Vec<RankingItem>,
        /// Unix seconds at which the rows were received.
        fetched_at: i64,
    },

    /// The fetch failed.
    RankingsFailed {
        ticket: FetchTicket,
        kind: FetchErrorKind,
        /// Human-readable error message, for logs.
        message: String,
    },
}

impl WorkerResponse {
    #[must_use]
    pub const fn ticket(&self) -> FetchTicket {
        match self {
            Self::RankingsLoaded { ticket, .. } | Self::RankingsFailed { ticket, .. } => *ticket,
        }
    }
}
