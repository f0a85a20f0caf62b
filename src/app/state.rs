//! Navigator state: the composition root of category, sub-filter, drill-down position and
//! fetch lifecycle.
//!
//! [`NavigatorState`] is the single owner of navigation state. Every operation that can
//! change the ranking being looked at recomposes the [`RankingQuery`] and asks the
//! [`RankingFetcher`] whether a request must go out; if so it returns the
//! [`WorkerMessage`] to post. Operations never fail: out-of-range or leaf-level requests
//! are logged no-ops.
//!
//! # Example
//!
//! ```
//! use ranktrail::app::{NavigatorSettings, NavigatorState};
//! use ranktrail::domain::{CategoryCatalog, RankingItem};
//!
//! let mut state = NavigatorState::new(CategoryCatalog::default(), "weather", NavigatorSettings::default());
//! assert!(state.fetch().is_some());
//!
//! state.on_row_activated(&RankingItem::new(1, "Japan"));
//! assert_eq!(state.breadcrumb_label(), "Japan");
//! ```

use crate::app::drill::{DrillLevel, DrillState};
use crate::app::fetcher::{RankingFetcher, RankingResult};
use crate::domain::{
    resolve_entity_type, resolve_query_type, Category, CategoryCatalog, RankingItem,
    SubFilterConfig,
};
use crate::domain::ranking::updated_ago;
use crate::service::RankingQuery;
use crate::ui::viewmodel::{
    DisplayRow, EmptyState, ErrorState, HeaderInfo, ListBody, RankingsViewModel, SearchBarInfo,
    SubFilterTab,
};
use crate::worker::{WorkerMessage, WorkerResponse};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeSet;

/// Request and presentation parameters fixed for a navigation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorSettings {
    /// Maximum rows requested per ranking.
    pub limit: u32,

    /// Language sent with every request.
    pub locale: String,

    /// Placeholder rows shown on a cold start.
    pub skeleton_rows: usize,

    /// Show failed fetches as "no data" instead of a distinct error state.
    pub errors_as_empty: bool,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            limit: 20,
            locale: "en".to_string(),
            skeleton_rows: 5,
            errors_as_empty: false,
        }
    }
}

/// Central navigator state container.
#[derive(Debug, Clone)]
pub struct NavigatorState {
    /// Categories offered for selection.
    pub catalog: CategoryCatalog,

    /// Active category.
    pub category: Category,

    /// Index of the active sub-filter within `category.sub_filters`.
    ///
    /// Always 0 after a category change; ignored when the category has no sub-filters.
    pub sub_filter_index: usize,

    /// Drill-down position.
    pub drill: DrillState,

    /// Fetch lifecycle of the ranking on display.
    pub fetcher: RankingFetcher,

    /// Fuzzy filter applied to the displayed rows, without refetching.
    pub row_filter: String,

    /// Request and presentation parameters.
    pub settings: NavigatorSettings,
}

impl NavigatorState {
    /// Creates a navigator at the global level of `category_id`.
    ///
    /// Nothing is fetched yet; call [`fetch`](Self::fetch) to issue the first request.
    #[must_use]
    pub fn new(catalog: CategoryCatalog, category_id: &str, settings: NavigatorSettings) -> Self {
        let category = catalog.resolve(category_id);
        Self {
            catalog,
            category,
            sub_filter_index: 0,
            drill: DrillState::Global,
            fetcher: RankingFetcher::new(),
            row_filter: String::new(),
            settings,
        }
    }

    /// The active sub-filter, if the category has any.
    #[must_use]
    pub fn active_sub_filter(&self) -> Option<&SubFilterConfig> {
        self.category.sub_filter(self.sub_filter_index)
    }

    /// Composes the query for the current position.
    #[must_use]
    pub fn current_query(&self) -> RankingQuery {
        let sub_filter_id = self.active_sub_filter().map(|f| f.id.as_str());

        RankingQuery {
            level: self.drill.level(),
            query_type: resolve_query_type(&self.category.id, sub_filter_id),
            entity_type: resolve_entity_type(&self.category.id).to_string(),
            country: self.drill.selected_country().map(str::to_string),
            state: self.drill.selected_state().map(str::to_string),
            limit: self.settings.limit,
            locale: self.settings.locale.clone(),
        }
    }

    /// Requests the current query if it is not already fetched or in flight.
    pub fn fetch(&mut self) -> Option<WorkerMessage> {
        let query = self.current_query();
        let ticket = self.fetcher.request(query.key())?;
        Some(WorkerMessage::fetch_rankings(ticket, query.to_request()))
    }

    /// Requests the current query again, even if unchanged.
    pub fn refresh(&mut self) -> WorkerMessage {
        let query = self.current_query();
        let ticket = self.fetcher.refresh(query.key());
        WorkerMessage::fetch_rankings(ticket, query.to_request())
    }

    /// Switches category, resetting sub-filter, drill-down position and row filter.
    ///
    /// Identifiers missing from the catalog are used as pass-through categories.
    pub fn select_category(&mut self, category_id: &str) -> Option<WorkerMessage> {
        tracing::debug!(from = %self.category.id, to = %category_id, "selecting category");

        self.category = self.catalog.resolve(category_id);
        self.sub_filter_index = 0;
        self.drill.reset();
        self.row_filter.clear();
        self.fetch()
    }

    /// Activates the sub-filter at `index` and returns to the global level.
    ///
    /// Out-of-range indices are ignored.
    pub fn select_sub_filter(&mut self, index: usize) -> Option<WorkerMessage> {
        if index >= self.category.sub_filters.len() {
            tracing::debug!(
                index = index,
                available = self.category.sub_filters.len(),
                category = %self.category.id,
                "ignoring out-of-range sub-filter"
            );
            return None;
        }

        tracing::debug!(index = index, sub_filter = %self.category.sub_filters[index].id, "selecting sub-filter");
        self.sub_filter_index = index;
        self.drill.reset();
        self.row_filter.clear();
        self.fetch()
    }

    /// Drills into `item`.
    ///
    /// No-op at the city level, for unnamed rows, and while the displayed rows belong to
    /// another level (stale rows kept on screen during a drill or back navigation).
    pub fn on_row_activated(&mut self, item: &RankingItem) -> Option<WorkerMessage> {
        if self.drill.level() == DrillLevel::City {
            tracing::debug!(entity = %item.entity_name, "row activation at leaf level ignored");
            return None;
        }

        if !self.rows_match_level() {
            tracing::debug!(
                entity = %item.entity_name,
                level = ?self.drill.level(),
                "row activation ignored, displayed rows belong to another level"
            );
            return None;
        }

        if !self.drill.drill_down(&item.entity_name) {
            return None;
        }

        self.row_filter.clear();
        self.fetch()
    }

    /// Widens the drill-down position by one level.
    pub fn on_back(&mut self) -> Option<WorkerMessage> {
        if self.drill.go_back() {
            self.row_filter.clear();
        }
        self.fetch()
    }

    #[must_use]
    pub fn breadcrumb_label(&self) -> &str {
        self.drill.breadcrumb_label()
    }

    #[must_use]
    pub const fn drill_down_offered(&self) -> bool {
        self.drill.drill_down_offered()
    }

    /// Whether the rows on display, if any, were fetched for the current drill-down level.
    ///
    /// False while a drill or back navigation is in flight over rows of the previous level.
    #[must_use]
    pub fn rows_match_level(&self) -> bool {
        self.fetcher
            .displayed_key()
            .map_or(true, |key| key.level == self.drill.level())
    }

    /// Whether activating a displayed row would drill further right now.
    #[must_use]
    pub fn rows_activatable(&self) -> bool {
        self.drill_down_offered() && self.rows_match_level()
    }

    /// Commits a worker response. Returns `false` if it answered a superseded request.
    pub fn apply_response(&mut self, response: &WorkerResponse) -> bool {
        match response {
            WorkerResponse::RankingsLoaded {
                ticket,
                items,
                fetched_at,
            } => self
                .fetcher
                .complete_success(*ticket, items.clone(), *fetched_at),
            WorkerResponse::RankingsFailed {
                ticket,
                kind,
                message,
            } => {
                let committed = self.fetcher.complete_failure(*ticket, *kind);
                if committed {
                    tracing::warn!(ticket = ticket.0, kind = ?kind, error = %message, "ranking fetch failed");
                }
                committed
            }
        }
    }

    /// Displayed rows after applying the row filter.
    ///
    /// Every whitespace-separated token of the filter must fuzzy-match the entity name.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&RankingItem> {
        let items = self.fetcher.displayed_items();

        let tokens = self.filter_tokens();
        if tokens.is_empty() {
            return items.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        items
            .iter()
            .filter(|item| {
                tokens
                    .iter()
                    .all(|t| matcher.fuzzy_match(&item.entity_name, t).is_some())
            })
            .collect()
    }

    /// Lowercased filter tokens; the matcher's smart case then ignores case.
    fn filter_tokens(&self) -> Vec<String> {
        self.row_filter
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    /// Computes the view model for the current state.
    ///
    /// `now` (unix seconds) is used for the "updated ... ago" label.
    #[must_use]
    pub fn compute_viewmodel(&self, now: i64) -> RankingsViewModel {
        let body = match self.fetcher.result() {
            RankingResult::Loading => ListBody::Skeleton {
                rows: self.settings.skeleton_rows,
            },
            RankingResult::Success(_) => self.compute_rows(),
            RankingResult::Empty => ListBody::Empty(Self::no_data()),
            RankingResult::Error(kind) if self.settings.errors_as_empty => {
                tracing::trace!(kind = ?kind, "presenting fetch error as empty");
                ListBody::Empty(Self::no_data())
            }
            RankingResult::Error(kind) => ListBody::Error(ErrorState {
                message: kind.message().to_string(),
                hint: "Retry, or navigate to load another ranking".to_string(),
            }),
        };

        RankingsViewModel {
            header: self.compute_header(),
            sub_filters: self.compute_tabs(),
            body,
            is_revalidating: self.fetcher.is_revalidating(),
            can_drill_down: self.rows_activatable(),
            can_go_back: self.drill.level() != DrillLevel::Global,
            updated_label: self
                .fetcher
                .displayed_fetched_at()
                .map(|at| format!("updated {}", updated_ago(at, now))),
            search_bar: (!self.row_filter.is_empty()).then(|| SearchBarInfo {
                query: self.row_filter.clone(),
            }),
        }
    }

    fn compute_rows(&self) -> ListBody {
        let visible = self.visible_items();
        if visible.is_empty() {
            return ListBody::Empty(EmptyState {
                message: "No matching rows".to_string(),
                subtitle: format!("Nothing here matches \"{}\"", self.row_filter),
            });
        }

        let tokens = self.filter_tokens();
        let matcher = SkimMatcherV2::default();

        ListBody::Rows(
            visible
                .into_iter()
                .map(|item| DisplayRow {
                    rank: item.rank,
                    name: item.entity_name.clone(),
                    flag: item.flag.clone(),
                    stat_label: item.stat_label.clone(),
                    trend: item.trend,
                    highlight_ranges: highlight_ranges(&matcher, &item.entity_name, &tokens),
                })
                .collect(),
        )
    }

    fn no_data() -> EmptyState {
        EmptyState {
            message: "No data".to_string(),
            subtitle: "There is no ranking for this selection yet".to_string(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = self.active_sub_filter().map_or_else(
            || self.category.label.clone(),
            |filter| format!("{} · {}", self.category.label, filter.label),
        );

        HeaderInfo {
            title,
            breadcrumb: self.breadcrumb_label().to_string(),
        }
    }

    fn compute_tabs(&self) -> Vec<SubFilterTab> {
        self.category
            .sub_filters
            .iter()
            .enumerate()
            .map(|(index, filter)| SubFilterTab {
                label: filter.label.clone(),
                is_active: index == self.sub_filter_index,
            })
            .collect()
    }
}

/// Character ranges of `text` matched by any of `tokens`, merged where they touch.
fn highlight_ranges(
    matcher: &SkimMatcherV2,
    text: &str,
    tokens: &[String],
) -> Vec<(usize, usize)> {
    let indices: BTreeSet<usize> = tokens
        .iter()
        .filter_map(|token| matcher.fuzzy_indices(text, token))
        .flat_map(|(_score, indices)| indices)
        .collect();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
