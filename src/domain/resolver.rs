//! Category and sub-filter resolution into backend query parameters.
//!
//! Both resolvers are total: any identifier, known or not, produces an answer. Unknown
//! categories pass through verbatim as their own query type and rank countries, so new
//! categories added upstream keep working without a code change here.
//!
//! The mappings are plain lookup tables. Adding a category is a table entry, not a branch.

/// Entity grain used for every category without an explicit override.
pub const DEFAULT_ENTITY_TYPE: &str = "country";

/// Sub-filter id → canonical backend query type.
const SUB_FILTER_QUERY_TYPES: &[(&str, &str)] = &[
    ("hottest", "hottest"),
    ("coldest", "coldest"),
    ("rainiest", "rainfall"),
    ("windiest", "wind_speed"),
    ("most_polluted", "air_quality"),
    ("cleanest_air", "air_quality_clean"),
    ("gdp", "gdp_total"),
    ("gdp_per_capita", "gdp_per_capita"),
    ("population", "population"),
    ("tv_shows", "top_shows"),
    ("movies", "top_movies"),
    ("searches", "search_trends"),
    ("hashtags", "hashtag_trends"),
];

/// Bare category id → canonical backend query type, used when no sub-filter matched.
const CATEGORY_QUERY_TYPES: &[(&str, &str)] = &[
    ("weather", "hottest"),
    ("air_quality", "air_quality"),
    ("economy", "gdp_total"),
    ("entertainment", "top_shows"),
    ("celebrity", "celebrity_buzz"),
    ("gossip", "celebrity_buzz"),
    ("trending", "search_trends"),
];

/// Categories whose rankings are not country-level.
pub const ENTITY_TYPE_OVERRIDES: &[(&str, &str)] = &[
    ("weather", "city"),
    ("sports", "match"),
    ("entertainment", "show"),
    ("celebrity", "person"),
    ("gossip", "person"),
    ("trending", "topic"),
];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Resolves the backend query type for a category and its active sub-filter.
///
/// First match wins: the sub-filter table, then the category table, then the category id
/// itself.
///
/// ```
/// use ranktrail::domain::resolver::resolve_query_type;
///
/// assert_eq!(resolve_query_type("weather", Some("coldest")), "coldest");
/// assert_eq!(resolve_query_type("weather", None), "hottest");
/// assert_eq!(resolve_query_type("sports", Some("darts")), "sports");
/// ```
#[must_use]
pub fn resolve_query_type(category: &str, sub_filter_id: Option<&str>) -> String {
    sub_filter_id
        .and_then(|id| lookup(SUB_FILTER_QUERY_TYPES, id))
        .or_else(|| lookup(CATEGORY_QUERY_TYPES, category))
        .map_or_else(|| category.to_string(), str::to_string)
}

/// Resolves the entity grain ranked for a category, `"country"` unless overridden.
#[must_use]
pub fn resolve_entity_type(category: &str) -> &'static str {
    lookup(ENTITY_TYPE_OVERRIDES, category).unwrap_or(DEFAULT_ENTITY_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryCatalog;

    #[test]
    fn weather_coldest_ranks_cities() {
        assert_eq!(resolve_query_type("weather", Some("coldest")), "coldest");
        assert_eq!(resolve_entity_type("weather"), "city");
    }

    #[test]
    fn sports_without_matching_sub_filter_passes_through() {
        assert_eq!(resolve_query_type("sports", None), "sports");
        assert_eq!(resolve_query_type("sports", Some("curling")), "sports");
        assert_eq!(resolve_entity_type("sports"), "match");
    }

    #[test]
    fn sub_filter_table_wins_over_category_table() {
        assert_eq!(resolve_query_type("entertainment", Some("movies")), "top_movies");
        assert_eq!(resolve_query_type("entertainment", Some("unknown")), "top_shows");
    }

    #[test]
    fn unknown_identifiers_degrade_instead_of_failing() {
        assert_eq!(resolve_query_type("space_weather", Some("solar_flares")), "space_weather");
        assert_eq!(resolve_entity_type("space_weather"), DEFAULT_ENTITY_TYPE);
        assert_eq!(resolve_entity_type(""), DEFAULT_ENTITY_TYPE);
    }

    #[test]
    fn entity_types_match_override_table_exhaustively() {
        let catalog = CategoryCatalog::default();
        for category in catalog.categories() {
            let expected = ENTITY_TYPE_OVERRIDES
                .iter()
                .find(|(id, _)| *id == category.id)
                .map_or("country", |(_, entity)| *entity);
            assert_eq!(resolve_entity_type(&category.id), expected, "category {}", category.id);
        }
        for (id, entity) in ENTITY_TYPE_OVERRIDES {
            assert_eq!(resolve_entity_type(id), *entity);
        }
    }

    #[test]
    fn every_catalog_pair_resolves_deterministically_to_non_empty() {
        let catalog = CategoryCatalog::default();
        for category in catalog.categories() {
            let mut ids: Vec<Option<&str>> =
                category.sub_filters.iter().map(|f| Some(f.id.as_str())).collect();
            ids.push(None);
            for id in ids {
                let first = resolve_query_type(&category.id, id);
                assert!(!first.is_empty(), "{} / {id:?}", category.id);
                assert_eq!(first, resolve_query_type(&category.id, id));
            }
        }
    }
}
