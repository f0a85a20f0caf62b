//! Ranking fetch lifecycle with stale-while-revalidate display and last-request-wins
//! commits.
//!
//! The fetcher never performs I/O. It decides whether a navigation change needs a new
//! request, hands out a [`FetchTicket`] for each request it wants issued, and accepts a
//! response only if it carries the latest ticket. Responses for superseded tickets are
//! dropped, whatever order the worker threads finish in.
//!
//! # Display rules
//!
//! | situation                                   | displayed                       |
//! |---------------------------------------------|---------------------------------|
//! | request pending, no data ever received      | `Loading` (skeleton)            |
//! | request pending, earlier data for any key   | earlier data, `is_revalidating` |
//! | latest response had rows                    | `Success(rows)`                 |
//! | latest response had zero rows               | `Empty`                         |
//! | latest response failed                      | `Error(kind)`                   |

use crate::app::drill::DrillLevel;
use crate::domain::{FetchErrorKind, RankingItem};
use serde::{Deserialize, Serialize};

/// Identity of a ranking request. A change in any field re-issues the fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    /// Drill-down level the ranking belongs to.
    pub level: DrillLevel,

    /// Backend ranking type, e.g. `hottest` or `gdp_total`.
    pub query_type: String,

    /// Kind of entity ranked, e.g. `country` or `city`.
    pub entity_type: String,

    /// Selected country below the global level.
    pub country: Option<String>,

    /// Selected region at the city level.
    pub state: Option<String>,
}

/// Monotonically increasing request epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FetchTicket(pub u64);

/// The single currently relevant result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingResult {
    /// Nothing to show yet; a request is in flight.
    Loading,
    /// Rows, possibly stale while a newer request is in flight.
    Success(Vec<RankingItem>),
    /// The latest response had no rows.
    Empty,
    /// The latest response failed.
    Error(FetchErrorKind),
}

/// Data committed from a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRankings {
    /// Request the rows answer.
    pub key: FetchKey,

    /// Normalized rows, in rank order.
    pub items: Vec<RankingItem>,

    /// Unix seconds at which the worker received the response.
    pub fetched_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Committed {
    Data(LoadedRankings),
    Failed(FetchErrorKind),
}

/// Tracks the request in flight and the result to display.
#[derive(Debug, Clone, Default)]
pub struct RankingFetcher {
    current_key: Option<FetchKey>,
    latest_ticket: u64,
    pending: Option<FetchTicket>,
    committed: Option<Committed>,
    /// Last data received for any key, kept across failures for revalidation.
    last_data: Option<LoadedRankings>,
}

impl RankingFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks for rankings for `key`.
    ///
    /// Returns a ticket if a request must be issued. Returns `None` when `key` is already
    /// being fetched or its data is already committed. A key whose last fetch failed is
    /// requested again.
    pub fn request(&mut self, key: FetchKey) -> Option<FetchTicket> {
        if self.current_key.as_ref() == Some(&key) {
            let loaded = matches!(&self.committed, Some(Committed::Data(data)) if data.key == key);
            if self.pending.is_some() || loaded {
                tracing::debug!(
                    level = ?key.level,
                    query_type = %key.query_type,
                    "fetch key unchanged, not refetching"
                );
                return None;
            }
        }

        Some(self.issue(key))
    }

    /// Issues a request for `key` even if it is unchanged.
    pub fn refresh(&mut self, key: FetchKey) -> FetchTicket {
        self.issue(key)
    }

    fn issue(&mut self, key: FetchKey) -> FetchTicket {
        self.latest_ticket += 1;
        let ticket = FetchTicket(self.latest_ticket);

        tracing::debug!(
            ticket = ticket.0,
            level = ?key.level,
            query_type = %key.query_type,
            entity_type = %key.entity_type,
            country = ?key.country,
            state = ?key.state,
            stale_available = self.last_data.is_some(),
            "issuing ranking fetch"
        );

        self.current_key = Some(key);
        self.pending = Some(ticket);
        ticket
    }

    /// Commits a successful response. Returns `false` if `ticket` was superseded.
    pub fn complete_success(
        &mut self,
        ticket: FetchTicket,
        items: Vec<RankingItem>,
        fetched_at: i64,
    ) -> bool {
        let Some(key) = self.accept(ticket) else {
            return false;
        };

        tracing::debug!(ticket = ticket.0, item_count = items.len(), "ranking fetch committed");

        let loaded = LoadedRankings {
            key,
            items,
            fetched_at,
        };
        self.last_data = Some(loaded.clone());
        self.committed = Some(Committed::Data(loaded));
        true
    }

    /// Commits a failed response. Returns `false` if `ticket` was superseded.
    pub fn complete_failure(&mut self, ticket: FetchTicket, kind: FetchErrorKind) -> bool {
        let Some(key) = self.accept(ticket) else {
            return false;
        };

        tracing::debug!(
            ticket = ticket.0,
            kind = ?kind,
            level = ?key.level,
            query_type = %key.query_type,
            "ranking fetch failed"
        );
        self.committed = Some(Committed::Failed(kind));
        true
    }

    fn accept(&mut self, ticket: FetchTicket) -> Option<FetchKey> {
        if self.pending != Some(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest_ticket = self.latest_ticket,
                "discarding response for superseded fetch"
            );
            return None;
        }

        self.pending = None;
        self.current_key.clone()
    }

    /// The result to display right now.
    #[must_use]
    pub fn result(&self) -> RankingResult {
        if self.pending.is_some() {
            return self
                .last_data
                .as_ref()
                .map_or(RankingResult::Loading, |data| Self::data_result(&data.items));
        }

        match &self.committed {
            None => RankingResult::Loading,
            Some(Committed::Data(data)) => Self::data_result(&data.items),
            Some(Committed::Failed(kind)) => RankingResult::Error(*kind),
        }
    }

    fn data_result(items: &[RankingItem]) -> RankingResult {
        if items.is_empty() {
            RankingResult::Empty
        } else {
            RankingResult::Success(items.to_vec())
        }
    }

    /// Rows to display right now (stale rows while revalidating).
    #[must_use]
    pub fn displayed_items(&self) -> &[RankingItem] {
        self.displayed_data().map_or(&[], |data| data.items.as_slice())
    }

    /// Key of the rows returned by [`displayed_items`](Self::displayed_items).
    ///
    /// While revalidating this is the key of the stale rows, not of the request in flight.
    #[must_use]
    pub fn displayed_key(&self) -> Option<&FetchKey> {
        self.displayed_data().map(|data| &data.key)
    }

    fn displayed_data(&self) -> Option<&LoadedRankings> {
        if self.pending.is_some() {
            self.last_data.as_ref()
        } else {
            match &self.committed {
                Some(Committed::Data(data)) => Some(data),
                _ => None,
            }
        }
    }

    /// Whether earlier data is on display while a newer request is in flight.
    #[must_use]
    pub const fn is_revalidating(&self) -> bool {
        self.pending.is_some() && self.last_data.is_some()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fetch time of the data currently on display.
    #[must_use]
    pub fn displayed_fetched_at(&self) -> Option<i64> {
        if self.pending.is_some() {
            return self.last_data.as_ref().map(|d| d.fetched_at);
        }
        match &self.committed {
            Some(Committed::Data(data)) => Some(data.fetched_at),
            _ => None,
        }
    }

    #[must_use]
    pub const fn current_key(&self) -> Option<&FetchKey> {
        self.current_key.as_ref()
    }

    #[must_use]
    pub const fn latest_ticket(&self) -> FetchTicket {
        FetchTicket(self.latest_ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(level: DrillLevel, query_type: &str, country: Option<&str>) -> FetchKey {
        FetchKey {
            level,
            query_type: query_type.to_string(),
            entity_type: "country".to_string(),
            country: country.map(str::to_string),
            state: None,
        }
    }

    fn rows(names: &[&str]) -> Vec<RankingItem> {
        names
            .iter()
            .zip(1u32..)
            .map(|(name, rank)| RankingItem::new(rank, *name))
            .collect()
    }

    #[test]
    fn cold_start_shows_loading() {
        let mut fetcher = RankingFetcher::new();
        assert_eq!(fetcher.result(), RankingResult::Loading);

        fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        assert_eq!(fetcher.result(), RankingResult::Loading);
        assert!(!fetcher.is_revalidating());
    }

    #[test]
    fn stale_rows_stay_visible_while_next_key_loads() {
        let mut fetcher = RankingFetcher::new();
        let k1 = fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        fetcher.complete_success(k1, rows(&["Japan", "Chile"]), 0);

        fetcher
            .request(key(DrillLevel::Country, "hottest", Some("Japan")))
            .unwrap();

        assert_eq!(fetcher.result(), RankingResult::Success(rows(&["Japan", "Chile"])));
        assert!(fetcher.is_revalidating());
        assert_eq!(fetcher.displayed_items().len(), 2);
    }

    #[test]
    fn stale_rows_stay_visible_until_next_key_errors() {
        let mut fetcher = RankingFetcher::new();
        let k1 = fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        fetcher.complete_success(k1, rows(&["Japan"]), 0);
        let k2 = fetcher.request(key(DrillLevel::Global, "coldest", None)).unwrap();

        assert_eq!(fetcher.result(), RankingResult::Success(rows(&["Japan"])));
        assert!(fetcher.complete_failure(k2, FetchErrorKind::Transport));
        assert_eq!(fetcher.result(), RankingResult::Error(FetchErrorKind::Transport));
        assert!(fetcher.displayed_items().is_empty());
    }

    #[test]
    fn late_response_for_superseded_key_is_discarded() {
        let mut fetcher = RankingFetcher::new();
        let k1 = fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        let k2 = fetcher.request(key(DrillLevel::Global, "coldest", None)).unwrap();

        assert!(fetcher.complete_success(k2, rows(&["Antarctica"]), 10));
        assert!(!fetcher.complete_success(k1, rows(&["Kuwait"]), 11));

        assert_eq!(fetcher.result(), RankingResult::Success(rows(&["Antarctica"])));
        assert_eq!(fetcher.displayed_fetched_at(), Some(10));
    }

    #[test]
    fn early_response_for_superseded_key_is_discarded_too() {
        let mut fetcher = RankingFetcher::new();
        let k1 = fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        let _k2 = fetcher.request(key(DrillLevel::Global, "coldest", None)).unwrap();

        assert!(!fetcher.complete_success(k1, rows(&["Kuwait"]), 0));
        assert_eq!(fetcher.result(), RankingResult::Loading);
        assert!(fetcher.is_pending());
    }

    #[test]
    fn zero_rows_render_empty_not_loading() {
        let mut fetcher = RankingFetcher::new();
        let ticket = fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        fetcher.complete_success(ticket, Vec::new(), 0);

        assert_eq!(fetcher.result(), RankingResult::Empty);
    }

    #[test]
    fn unchanged_key_is_not_refetched() {
        let mut fetcher = RankingFetcher::new();
        let k = key(DrillLevel::Global, "hottest", None);
        let ticket = fetcher.request(k.clone()).unwrap();

        assert!(fetcher.request(k.clone()).is_none());
        fetcher.complete_success(ticket, rows(&["Japan"]), 0);
        assert!(fetcher.request(k.clone()).is_none());

        let retry = fetcher.refresh(k);
        assert!(retry > ticket);
        assert!(fetcher.is_revalidating());
    }

    #[test]
    fn failed_key_is_requested_again() {
        let mut fetcher = RankingFetcher::new();
        let k = key(DrillLevel::Global, "hottest", None);
        let ticket = fetcher.request(k.clone()).unwrap();
        fetcher.complete_failure(ticket, FetchErrorKind::Service);

        let retry = fetcher.request(k.clone()).unwrap();
        assert!(retry > ticket);
        assert!(fetcher.request(k).is_none());
    }

    #[test]
    fn displayed_key_follows_stale_rows_while_pending() {
        let mut fetcher = RankingFetcher::new();
        assert_eq!(fetcher.displayed_key(), None);

        let global = key(DrillLevel::Global, "hottest", None);
        let ticket = fetcher.request(global.clone()).unwrap();
        fetcher.complete_success(ticket, rows(&["Japan"]), 0);

        let country = key(DrillLevel::Country, "hottest", Some("Japan"));
        let ticket = fetcher.request(country.clone()).unwrap();
        assert_eq!(fetcher.displayed_key(), Some(&global));

        fetcher.complete_success(ticket, rows(&["Sapporo"]), 0);
        assert_eq!(fetcher.displayed_key(), Some(&country));
    }

    #[test]
    fn errors_do_not_forget_earlier_data() {
        let mut fetcher = RankingFetcher::new();
        let k1 = fetcher.request(key(DrillLevel::Global, "hottest", None)).unwrap();
        fetcher.complete_success(k1, rows(&["Japan"]), 0);
        let k2 = fetcher.request(key(DrillLevel::Global, "coldest", None)).unwrap();
        fetcher.complete_failure(k2, FetchErrorKind::Malformed);

        fetcher.request(key(DrillLevel::Global, "rainfall", None)).unwrap();
        assert_eq!(fetcher.result(), RankingResult::Success(rows(&["Japan"])));
        assert!(fetcher.is_revalidating());
    }
}
