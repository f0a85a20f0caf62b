//! Ranked entity model and boundary normalization.
//!
//! The data service sends loosely typed rows ([`RawRankingItem`]) where every display field
//! is optional. They are normalized exactly once, when a response crosses the fetch
//! boundary, into [`RankingItem`] values whose fallbacks (globe marker, "Live Data" label,
//! flat trend, positional id and rank) are already substituted.

use serde::{Deserialize, Serialize};

/// Marker shown when a row carries no flag or icon.
pub const DEFAULT_FLAG: &str = "🌐";

/// Statistic label shown when a row carries none.
pub const DEFAULT_STAT_LABEL: &str = "Live Data";

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86400;

/// Movement of an entity relative to the previous ranking period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    #[default]
    Same,
}

impl Trend {
    /// Parses a wire trend value. Unknown values degrade to [`Trend::Same`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            _ => Self::Same,
        }
    }

    /// Single-character arrow for plain-text displays.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Same => "–",
        }
    }
}

/// One ranked entity, normalized and ready for display or drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingItem {
    /// 1-based position, ascending = more prominent.
    pub rank: u32,
    /// Stable identifier; positional index when the service sent none.
    pub entity_id: String,
    /// Display name, also the filter value for the next drill-down level.
    pub entity_name: String,
    /// Flag emoji; a neutral flag when the service sent none.
    pub flag: String,
    /// Formatted statistic; "Live Data" when the service sent none.
    pub stat_label: String,
    /// Movement since the previous period; `Same` when unknown.
    pub trend: Trend,
}

impl RankingItem {
    /// Creates an item with default flag, statistic and trend.
    #[must_use]
    pub fn new(rank: u32, entity_name: impl Into<String>) -> Self {
        Self {
            rank,
            entity_id: rank.saturating_sub(1).to_string(),
            entity_name: entity_name.into(),
            flag: DEFAULT_FLAG.to_string(),
            stat_label: DEFAULT_STAT_LABEL.to_string(),
            trend: Trend::Same,
        }
    }

    /// Whether this row can be used as the filter value of a deeper level.
    #[must_use]
    pub fn is_drillable(&self) -> bool {
        !self.entity_name.trim().is_empty()
    }
}

/// A ranking row exactly as the data service sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRankingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    /// Either a string or a number on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
}

impl RawRankingItem {
    /// Substitutes every fallback, using `position` (0-based) for missing id and rank.
    #[must_use]
    pub fn normalize(self, position: usize) -> RankingItem {
        let entity_id = match self.entity_id {
            Some(serde_json::Value::String(id)) if !id.is_empty() => id,
            Some(serde_json::Value::Number(id)) => id.to_string(),
            _ => position.to_string(),
        };

        let rank = self
            .rank
            .unwrap_or_else(|| u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1));

        RankingItem {
            rank,
            entity_id,
            entity_name: self.entity_name.unwrap_or_default(),
            flag: non_blank(self.flag).unwrap_or_else(|| DEFAULT_FLAG.to_string()),
            stat_label: non_blank(self.stat_label)
                .unwrap_or_else(|| DEFAULT_STAT_LABEL.to_string()),
            trend: self.trend.as_deref().map_or(Trend::Same, Trend::parse),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalizes a whole response, preserving the service's order.
///
/// Ranks are trusted as sent. A list whose ranks are not `1..=n` is still returned as is,
/// but the violation is logged.
#[must_use]
pub fn normalize_items(raw: Vec<RawRankingItem>) -> Vec<RankingItem> {
    let items: Vec<RankingItem> = raw
        .into_iter()
        .enumerate()
        .map(|(position, item)| item.normalize(position))
        .collect();

    if !ranks_are_contiguous(&items) {
        tracing::warn!(
            item_count = items.len(),
            first_rank = items.first().map(|i| i.rank),
            "ranking response ranks are not contiguous from 1"
        );
    }

    items
}

/// Whether ranks run `1, 2, 3, ...` in order.
#[must_use]
pub fn ranks_are_contiguous(items: &[RankingItem]) -> bool {
    items
        .iter()
        .zip(1u32..)
        .all(|(item, expected)| item.rank == expected)
}

/// Human-readable age of a result fetched at `fetched_at` (unix seconds).
///
/// - under a minute: "just now"
/// - under an hour: "5m ago"
/// - under a day: "3h ago"
/// - otherwise: "7d ago"
#[must_use]
pub fn updated_ago(fetched_at: i64, now: i64) -> String {
    let diff = (now - fetched_at).max(0);

    if diff < SECONDS_PER_MINUTE {
        "just now".to_string()
    } else if diff < SECONDS_PER_HOUR {
        format!("{}m ago", diff / SECONDS_PER_MINUTE)
    } else if diff < SECONDS_PER_DAY {
        format!("{}h ago", diff / SECONDS_PER_HOUR)
    } else {
        format!("{}d ago", diff / SECONDS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_display_fields_fall_back() {
        let item = RawRankingItem {
            entity_name: Some("Japan".into()),
            ..Default::default()
        }
        .normalize(2);

        assert_eq!(item.rank, 3);
        assert_eq!(item.entity_id, "2");
        assert_eq!(item.flag, DEFAULT_FLAG);
        assert_eq!(item.stat_label, DEFAULT_STAT_LABEL);
        assert_eq!(item.trend, Trend::Same);
    }

    #[test]
    fn wire_fields_are_kept_when_present() {
        let raw: RawRankingItem = serde_json::from_str(
            r#"{"rank":1,"entityId":42,"entityName":"Oslo","flag":"🇳🇴","statLabel":"-21°C","trend":"DOWN"}"#,
        )
        .unwrap();
        let item = raw.normalize(0);

        assert_eq!(item.entity_id, "42");
        assert_eq!(item.entity_name, "Oslo");
        assert_eq!(item.flag, "🇳🇴");
        assert_eq!(item.stat_label, "-21°C");
        assert_eq!(item.trend, Trend::Down);
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let item = RawRankingItem {
            rank: Some(1),
            entity_id: Some(serde_json::Value::String(String::new())),
            flag: Some("  ".into()),
            stat_label: Some(String::new()),
            trend: Some("sideways".into()),
            ..Default::default()
        }
        .normalize(0);

        assert_eq!(item.entity_id, "0");
        assert_eq!(item.flag, DEFAULT_FLAG);
        assert_eq!(item.stat_label, DEFAULT_STAT_LABEL);
        assert_eq!(item.trend, Trend::Same);
        assert!(!item.is_drillable());
    }

    #[test]
    fn normalization_does_not_reorder() {
        let raw = vec![
            RawRankingItem { rank: Some(2), ..Default::default() },
            RawRankingItem { rank: Some(1), ..Default::default() },
        ];
        let items = normalize_items(raw);

        assert_eq!(items.iter().map(|i| i.rank).collect::<Vec<_>>(), vec![2, 1]);
        assert!(!ranks_are_contiguous(&items));
    }

    #[test]
    fn updated_ago_buckets() {
        assert_eq!(updated_ago(1_000, 1_030), "just now");
        assert_eq!(updated_ago(1_000, 1_000 + 5 * 60), "5m ago");
        assert_eq!(updated_ago(0, 3 * 3600 + 12), "3h ago");
        assert_eq!(updated_ago(0, 8 * 86400), "8d ago");
        assert_eq!(updated_ago(500, 100), "just now");
    }
}
