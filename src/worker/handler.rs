//! Fetch execution against a ranking service.
//!
//! [`RankingWorker`] turns a [`WorkerMessage`] into a [`WorkerResponse`]: it calls the
//! service, normalizes the raw rows, and converts failures into a response instead of an
//! error so the navigator always hears back about its ticket.

use crate::domain::error::Result;
use crate::domain::ranking::normalize_items;
use crate::domain::RankingItem;
use crate::service::{RankingRequest, RankingService};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::Arc;

/// Executes fetch messages against a shared ranking service.
#[derive(Clone)]
pub struct RankingWorker {
    service: Arc<dyn RankingService>,
}

impl RankingWorker {
    #[must_use]
    pub fn new(service: Arc<dyn RankingService>) -> Self {
        Self { service }
    }

    fn fetch(&self, request: &RankingRequest) -> Result<Vec<RankingItem>> {
        let raw = self.service.fetch_rankings(request)?;
        Ok(normalize_items(raw))
    }

    /// Attaches the issuing span's context so worker spans join its trace.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes a worker message and returns the response for its ticket.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let ticket = message.ticket();
        let span = tracing::debug_span!("worker_handle_message", ticket = ticket.0);
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchRankings { request, .. } => match self.fetch(&request) {
                Ok(items) => {
                    tracing::debug!(item_count = items.len(), "rankings fetched");
                    WorkerResponse::RankingsLoaded {
                        ticket,
                        items,
                        fetched_at: chrono::Utc::now().timestamp(),
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "rankings fetch failed");
                    WorkerResponse::RankingsFailed {
                        ticket,
                        kind: e.fetch_kind(),
                        message: e.to_string(),
                    }
                }
            },
        }
    }
}

impl std::fmt::Debug for RankingWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingWorker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fetcher::FetchTicket;
    use crate::domain::{FetchErrorKind, RanktrailError, RawRankingItem};

    struct FixedService(Vec<RawRankingItem>);

    impl RankingService for FixedService {
        fn fetch_rankings(&self, _request: &RankingRequest) -> Result<Vec<RawRankingItem>> {
            Ok(self.0.clone())
        }
    }

    struct FailingService;

    impl RankingService for FailingService {
        fn fetch_rankings(&self, _request: &RankingRequest) -> Result<Vec<RawRankingItem>> {
            Err(RanktrailError::Transport("connection refused".into()))
        }
    }

    fn message(ticket: u64) -> WorkerMessage {
        WorkerMessage::fetch_rankings(
            FetchTicket(ticket),
            RankingRequest {
                query_type: "hottest".into(),
                entity_type: "city".into(),
                country: None,
                state: None,
                limit: 5,
                language: "en".into(),
            },
        )
    }

    #[test]
    fn loaded_rows_are_normalized_and_tagged() {
        let worker = RankingWorker::new(Arc::new(FixedService(vec![RawRankingItem {
            entity_name: Some("Kuwait City".into()),
            ..Default::default()
        }])));

        match worker.handle_message(message(7)) {
            WorkerResponse::RankingsLoaded { ticket, items, .. } => {
                assert_eq!(ticket, FetchTicket(7));
                assert_eq!(items[0].rank, 1);
                assert_eq!(items[0].stat_label, "Live Data");
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn failures_become_tagged_failure_responses() {
        let worker = RankingWorker::new(Arc::new(FailingService));

        match worker.handle_message(message(3)) {
            WorkerResponse::RankingsFailed { ticket, kind, message } => {
                assert_eq!(ticket, FetchTicket(3));
                assert_eq!(kind, FetchErrorKind::Transport);
                assert!(message.contains("connection refused"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }
}
