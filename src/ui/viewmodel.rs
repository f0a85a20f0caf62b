//! View model types representing renderable navigator state.
//!
//! View models are computed from [`NavigatorState`](crate::app::NavigatorState) via
//! `compute_viewmodel()` and handed to whatever renders them. They hold display-ready data
//! only: fallbacks are already substituted, the body variant already decides between
//! skeleton, rows, empty and error.

use crate::domain::Trend;

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingsViewModel {
    /// Category title and drill-down breadcrumb.
    pub header: HeaderInfo,

    /// Sub-filter tabs of the active category, in display order.
    pub sub_filters: Vec<SubFilterTab>,

    /// Main list area.
    pub body: ListBody,

    /// Whether the body shows earlier results while a newer request is in flight.
    pub is_revalidating: bool,

    /// Whether rows may be activated to drill further.
    ///
    /// False at the city level and while the rows on display belong to the previous level.
    pub can_drill_down: bool,

    /// Whether a back navigation is available (false at the global level).
    pub can_go_back: bool,

    /// Age of the displayed rows, e.g. "updated 5m ago".
    pub updated_label: Option<String>,

    /// Row filter input, present while a filter query is set.
    pub search_bar: Option<SearchBarInfo>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Category label, with the active sub-filter label when there is one.
    pub title: String,

    /// "Global Rankings", or the selected country or region.
    pub breadcrumb: String,
}

/// One sub-filter tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFilterTab {
    /// Tab caption, e.g. "Coldest".
    pub label: String,

    /// Whether this sub-filter drives the current query.
    pub is_active: bool,
}

/// What the list area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBody {
    /// Cold start placeholder with a fixed number of rows.
    Skeleton {
        /// Number of placeholder rows.
        rows: usize,
    },

    /// Ranked rows (possibly stale, see `is_revalidating`).
    Rows(Vec<DisplayRow>),

    /// A valid query returned nothing, or the row filter matched nothing.
    Empty(EmptyState),

    /// The latest fetch failed.
    Error(ErrorState),
}

/// Display information for a single ranked row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// 1-based position within the ranking.
    pub rank: u32,

    /// Entity name as sent by the service.
    pub name: String,

    /// Flag emoji, or the neutral fallback.
    pub flag: String,

    /// Formatted statistic, e.g. "38°C".
    pub stat_label: String,

    /// Movement since the previous period.
    pub trend: Trend,

    /// Character (not byte) ranges of `name` matched by the row filter, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Empty state message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Short headline, e.g. "No data".
    pub message: String,

    /// Explanation shown below the headline.
    pub subtitle: String,
}

/// Error state message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
    /// What went wrong, phrased for the user.
    pub message: String,

    /// Suggested next step, e.g. retrying.
    pub hint: String,
}

/// Current row filter query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Filter text as typed.
    pub query: String,
}
