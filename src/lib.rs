//! Ranktrail: hierarchical ranking navigation with drill-down and stale-while-revalidate
//! fetching.
//!
//! Ranktrail resolves a topic category and sub-filter into backend query parameters,
//! tracks a worldwide → country → city drill-down position, requests ranked lists for
//! that position, and keeps the previous list on screen while a newer one is in flight.
//! Responses that arrive after a newer request was issued are discarded.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal driver (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │
//! │  - Event handling, actions                          │
//! │  - Drill-down state machine                         │
//! │  - Fetch lifecycle (tickets, revalidation)          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Service Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (service/)    │   │ (worker/)     │
//! │ - View models │   │ - Wire models │   │ - Fetch exec  │
//! │               │   │ - JSON dataset│   │ - Thread pool │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory, paths (infrastructure/)          │
//! │  - Errors, rankings, categories, resolver (domain/) │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry spans to a rotating JSON-lines file│
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```toml
//! # ~/.config/ranktrail.toml
//! limit = 20
//! locale = "en"
//! dataset_path = "~/.local/share/ranktrail/rankings.json"
//! initial_category = "weather"
//! errors_as_empty = false
//! trace_level = "debug"
//!
//! [[categories]]
//! id = "weather"
//! label = "Weather"
//! sub_filters = [{ id = "hottest", label = "Hottest" }, { id = "coldest", label = "Coldest" }]
//! ```
//!
//! # Example
//!
//! ```
//! use ranktrail::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (_, actions) = handle_event(&mut state, &Event::Start)?;
//!
//! for action in actions {
//!     if let Action::PostToWorker(message) = action {
//!         // hand `message` to a WorkerPool, feed its response back as Event::WorkerResponse
//!         assert_eq!(message.ticket().0, 1);
//!     }
//! }
//! # Ok::<(), ranktrail::RanktrailError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod service;
pub mod worker;

pub mod ui;

pub use app::{handle_event, Action, Event, NavigatorSettings, NavigatorState};
pub use domain::{Category, CategoryCatalog, RankingItem, RanktrailError, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Rows requested per ranking. Default: 20
    pub limit: u32,

    /// Language sent with every request. Default: `"en"`
    pub locale: String,

    /// JSON dataset served by the bundled service.
    ///
    /// Default: `<data_dir>/rankings.json`. `~` is expanded.
    pub dataset_path: Option<String>,

    /// TOML file with `[[categories]]`. Default: the built-in catalog.
    pub catalog_path: Option<String>,

    /// Category shown on start. Default: `"weather"`
    pub initial_category: String,

    /// Present fetch errors as "no data". Default: false
    pub errors_as_empty: bool,

    /// Placeholder rows on a cold start. Default: 5
    pub skeleton_rows: usize,

    /// Filter directive for tracing, e.g. `debug` or `ranktrail=trace`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Also print log events to stderr. Default: false
    pub log_to_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: 20,
            locale: "en".to_string(),
            dataset_path: None,
            catalog_path: None,
            initial_category: "weather".to_string(),
            errors_as_empty: false,
            skeleton_rows: 5,
            trace_level: None,
            log_to_stderr: false,
        }
    }
}

/// On-disk form of [`Config`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    limit: Option<u32>,
    locale: Option<String>,
    dataset_path: Option<String>,
    catalog_path: Option<String>,
    initial_category: Option<String>,
    errors_as_empty: Option<bool>,
    skeleton_rows: Option<usize>,
    trace_level: Option<String>,
    log_to_stderr: Option<bool>,
    categories: Vec<Category>,
}

fn map_text(map: &BTreeMap<String, String>, key: &str) -> Option<String> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn map_parsed<T: FromStr>(map: &BTreeMap<String, String>, key: &str) -> Option<T> {
    map_text(map, key).and_then(|v| v.parse().ok())
}

impl Config {
    /// Parses configuration from a string map.
    ///
    /// Missing keys and unparsable values fall back to their defaults individually.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use ranktrail::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("limit".to_string(), "10".to_string());
    /// map.insert("skeleton_rows".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.limit, 10);
    /// assert_eq!(config.skeleton_rows, 5);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| map_text(map, key);

        Self {
            limit: map_parsed::<u32>(map, "limit").filter(|l| *l > 0).unwrap_or(defaults.limit),
            locale: text("locale").unwrap_or(defaults.locale),
            dataset_path: text("dataset_path"),
            catalog_path: text("catalog_path"),
            initial_category: text("initial_category").unwrap_or(defaults.initial_category),
            errors_as_empty: map_parsed(map, "errors_as_empty").unwrap_or(defaults.errors_as_empty),
            skeleton_rows: map_parsed(map, "skeleton_rows").unwrap_or(defaults.skeleton_rows),
            trace_level: text("trace_level"),
            log_to_stderr: map_parsed(map, "log_to_stderr").unwrap_or(defaults.log_to_stderr),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// If the file declares `[[categories]]` and no `catalog_path`, the file itself becomes
    /// the catalog source.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| RanktrailError::Config(format!("invalid config {}: {e}", path.display())))?;

        let defaults = Self::default();
        let catalog_path = file.catalog_path.or_else(|| {
            (!file.categories.is_empty()).then(|| path.to_string_lossy().into_owned())
        });

        Ok(Self {
            limit: file.limit.filter(|l| *l > 0).unwrap_or(defaults.limit),
            locale: file.locale.unwrap_or(defaults.locale),
            dataset_path: file.dataset_path,
            catalog_path,
            initial_category: file.initial_category.unwrap_or(defaults.initial_category),
            errors_as_empty: file.errors_as_empty.unwrap_or(defaults.errors_as_empty),
            skeleton_rows: file.skeleton_rows.unwrap_or(defaults.skeleton_rows),
            trace_level: file.trace_level,
            log_to_stderr: file.log_to_stderr.unwrap_or(defaults.log_to_stderr),
        })
    }

    /// Dataset location with `~` expanded.
    #[must_use]
    pub fn resolved_dataset_path(&self) -> PathBuf {
        self.dataset_path.as_deref().map_or_else(
            || infrastructure::get_data_dir().join("rankings.json"),
            |p| PathBuf::from(infrastructure::expand_tilde(p)),
        )
    }

    #[must_use]
    pub fn navigator_settings(&self) -> NavigatorSettings {
        NavigatorSettings {
            limit: self.limit,
            locale: self.locale.clone(),
            skeleton_rows: self.skeleton_rows,
            errors_as_empty: self.errors_as_empty,
        }
    }

    /// Loads the configured catalog, falling back to the built-in one on failure.
    #[must_use]
    pub fn load_catalog(&self) -> CategoryCatalog {
        self.catalog_path.as_deref().map_or_else(CategoryCatalog::default, |path| {
            let path = PathBuf::from(infrastructure::expand_tilde(path));
            CategoryCatalog::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(path = ?path, error = %e, "failed to load category catalog, using default");
                CategoryCatalog::default()
            })
        })
    }
}

/// Builds the navigator for `config`.
///
/// Nothing is fetched yet; handle [`Event::Start`] to issue the first request.
#[must_use]
pub fn initialize(config: &Config) -> NavigatorState {
    tracing::debug!(
        initial_category = %config.initial_category,
        limit = config.limit,
        locale = %config.locale,
        "initializing navigator"
    );

    NavigatorState::new(
        config.load_catalog(),
        &config.initial_category,
        config.navigator_settings(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_values_fall_back_individually() {
        let map = BTreeMap::from([
            ("limit".to_string(), "0".to_string()),
            ("locale".to_string(), "ja".to_string()),
            ("errors_as_empty".to_string(), "true".to_string()),
            ("trace_level".to_string(), "  ".to_string()),
        ]);

        let config = Config::from_map(&map);
        assert_eq!(config.limit, 20);
        assert_eq!(config.locale, "ja");
        assert!(config.errors_as_empty);
        assert_eq!(config.trace_level, None);
    }

    #[test]
    fn file_with_categories_is_its_own_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranktrail.toml");
        std::fs::write(
            &path,
            r#"
limit = 5
initial_category = "music"

[[categories]]
id = "music"
label = "Music"
sub_filters = [{ id = "albums", label = "Albums" }]
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.limit, 5);
        assert_eq!(config.catalog_path.as_deref(), path.to_str());

        let state = initialize(&config);
        assert_eq!(state.category.label, "Music");
        assert_eq!(state.current_query().query_type, "music");
        assert_eq!(state.settings.limit, 5);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranktrail.toml");
        std::fs::write(&path, "limt = 5\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(RanktrailError::Config(_))));
    }

    #[test]
    fn broken_catalog_falls_back_to_default() {
        let config = Config {
            catalog_path: Some("/nonexistent/catalog.toml".to_string()),
            ..Config::default()
        };

        assert_eq!(config.load_catalog(), CategoryCatalog::default());
    }
}
