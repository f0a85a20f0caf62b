//! Categories, their sub-filters, and the catalog that orders them.
//!
//! A [`CategoryCatalog`] is either the built-in default or deserialized from the
//! `[[categories]]` tables of a TOML file:
//!
//! ```toml
//! [[categories]]
//! id = "weather"
//! label = "Weather"
//! sub_filters = [
//!     { id = "hottest", label = "Hottest" },
//!     { id = "coldest", label = "Coldest" },
//! ]
//! ```

use crate::domain::error::{RanktrailError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One selectable variant of a category, e.g. "Coldest" within weather.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubFilterConfig {
    /// Identifier mapped to a backend query type, e.g. `coldest`.
    pub id: String,
    /// Tab caption.
    pub label: String,
}

impl SubFilterConfig {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A top-level topic grouping and its sub-filters in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier used for query and entity type resolution, e.g. `weather`.
    pub id: String,
    /// Display name shown in the header.
    pub label: String,
    /// Variants offered as tabs; empty for categories without sub-filters.
    #[serde(default)]
    pub sub_filters: Vec<SubFilterConfig>,
}

impl Category {
    /// A category known only by id: labelled with its id and without sub-filters.
    #[must_use]
    pub fn bare(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            sub_filters: Vec::new(),
        }
    }

    /// Returns the sub-filter at `index`, if in bounds.
    #[must_use]
    pub fn sub_filter(&self, index: usize) -> Option<&SubFilterConfig> {
        self.sub_filters.get(index)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Ordered set of categories offered to the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Creates a catalog from categories in display order.
    #[must_use]
    pub const fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Loads the `[[categories]]` tables of a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or declares no
    /// categories.
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = ?path, "loading category catalog");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses the `[[categories]]` tables of a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or declares no categories.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents)
            .map_err(|e| RanktrailError::Config(format!("invalid category catalog: {e}")))?;

        if file.categories.is_empty() {
            return Err(RanktrailError::Config(
                "category catalog declares no categories".to_string(),
            ));
        }

        tracing::debug!(category_count = file.categories.len(), "category catalog parsed");
        Ok(Self::new(file.categories))
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by id, falling back to a bare pass-through category.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Category {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .unwrap_or_else(|| {
                tracing::debug!(category = %id, "category not in catalog, passing through");
                Category::bare(id)
            })
    }

    /// The first category in display order.
    #[must_use]
    pub fn first(&self) -> Option<&Category> {
        self.categories.first()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        let category = |id: &str, label: &str, filters: &[(&str, &str)]| Category {
            id: id.to_string(),
            label: label.to_string(),
            sub_filters: filters
                .iter()
                .map(|(id, label)| SubFilterConfig::new(*id, *label))
                .collect(),
        };

        Self::new(vec![
            category(
                "weather",
                "Weather",
                &[
                    ("hottest", "Hottest"),
                    ("coldest", "Coldest"),
                    ("rainiest", "Rainiest"),
                    ("windiest", "Windiest"),
                ],
            ),
            category(
                "air_quality",
                "Air Quality",
                &[("most_polluted", "Most Polluted"), ("cleanest_air", "Cleanest Air")],
            ),
            category(
                "economy",
                "Economy",
                &[
                    ("gdp", "GDP"),
                    ("gdp_per_capita", "GDP per Capita"),
                    ("population", "Population"),
                ],
            ),
            category("sports", "Sports", &[]),
            category(
                "entertainment",
                "Entertainment",
                &[("tv_shows", "TV Shows"), ("movies", "Movies")],
            ),
            category("celebrity", "Celebrity", &[]),
            category(
                "trending",
                "Trending",
                &[("searches", "Searches"), ("hashtags", "Hashtags")],
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_resolves_to_bare_pass_through() {
        let catalog = CategoryCatalog::default();
        let category = catalog.resolve("space_weather");

        assert_eq!(category.id, "space_weather");
        assert_eq!(category.label, "space_weather");
        assert!(category.sub_filters.is_empty());
    }

    #[test]
    fn sub_filters_keep_declaration_order() {
        let catalog = CategoryCatalog::from_toml_str(
            r#"
            [[categories]]
            id = "weather"
            label = "Weather"
            sub_filters = [
                { id = "coldest", label = "Coldest" },
                { id = "hottest", label = "Hottest" },
            ]

            [[categories]]
            id = "sports"
            label = "Sports"
            "#,
        )
        .unwrap();

        let weather = catalog.resolve("weather");
        let ids: Vec<&str> = weather.sub_filters.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["coldest", "hottest"]);
        assert!(catalog.resolve("sports").sub_filters.is_empty());
        assert_eq!(catalog.first().map(|c| c.id.as_str()), Some("weather"));
    }

    #[test]
    fn empty_catalog_is_a_config_error() {
        let err = CategoryCatalog::from_toml_str("limit = 3").unwrap_err();
        assert!(matches!(err, RanktrailError::Config(_)));
    }

    #[test]
    fn out_of_bounds_sub_filter_is_none() {
        let weather = CategoryCatalog::default().resolve("weather");
        assert!(weather.sub_filter(3).is_some());
        assert!(weather.sub_filter(4).is_none());
    }
}
