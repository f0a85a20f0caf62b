//! Ranking data service abstraction.
//!
//! The navigator never talks to a transport directly. Worker threads call a
//! [`RankingService`] with a wire [`RankingRequest`] and receive the rows exactly as the
//! service sent them; normalization happens afterwards, in the worker.

use crate::domain::error::Result;
use crate::domain::RawRankingItem;
use crate::service::models::RankingRequest;

/// A source of ranked lists.
///
/// Implementations are shared read-only between worker threads, hence `Send + Sync`.
///
/// # Implementations
///
/// - [`JsonRankingService`](crate::service::JsonRankingService): JSON dataset file
pub trait RankingService: Send + Sync {
    /// Fetches the ranked rows for `request`, sorted by rank, at most `request.limit` long.
    ///
    /// A valid request without data yields `Ok` with an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error on any transport, decoding or service failure.
    fn fetch_rankings(&self, request: &RankingRequest) -> Result<Vec<RawRankingItem>>;
}
