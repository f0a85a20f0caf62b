//! JSON dataset-backed ranking service.
//!
//! Serves rankings from a local JSON file, for offline use of the navigator and for tests.
//! The file is re-read on every request so edits show up on the next navigation.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "rankings": [
//!     {
//!       "type": "coldest",
//!       "entityType": "city",
//!       "country": "Japan",
//!       "items": [
//!         { "rank": 1, "entityName": "Asahikawa", "statLabel": "-18°C", "trend": "down" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! An entry matches a request on `type`, `entityType`, `country` and `state` (absent means
//! the worldwide or country-wide list). An entry naming a `language` only matches requests
//! in that language; one without serves every language.

use crate::domain::error::{RanktrailError, Result};
use crate::domain::RawRankingItem;
use crate::service::backend::RankingService;
use crate::service::models::RankingRequest;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Dataset {
    #[serde(default = "Dataset::current_version")]
    version: u32,

    #[serde(default)]
    rankings: Vec<DatasetEntry>,
}

impl Dataset {
    const fn current_version() -> u32 {
        1
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatasetEntry {
    #[serde(rename = "type")]
    query_type: String,
    entity_type: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    items: Vec<RawRankingItem>,
}

impl DatasetEntry {
    fn matches(&self, request: &RankingRequest) -> bool {
        self.query_type == request.query_type
            && self.entity_type == request.entity_type
            && self.country == request.country
            && self.state == request.state
            && self
                .language
                .as_ref()
                .map_or(true, |language| language == &request.language)
    }
}

/// Ranking service reading a JSON dataset file.
#[derive(Debug, Clone)]
pub struct JsonRankingService {
    file_path: PathBuf,
}

impl JsonRankingService {
    /// Creates a service over the dataset at `file_path`.
    ///
    /// The file is not opened here; a missing file surfaces as a transport failure on the
    /// first fetch, which the navigator shows as an error state.
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        tracing::debug!(path = ?file_path, "initializing JSON ranking service");
        Self { file_path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load(&self) -> Result<Dataset> {
        let contents = std::fs::read_to_string(&self.file_path).map_err(|e| {
            RanktrailError::Transport(format!("cannot read {}: {e}", self.file_path.display()))
        })?;

        let dataset: Dataset = serde_json::from_str(&contents)
            .map_err(|e| RanktrailError::Malformed(format!("failed to parse dataset: {e}")))?;

        tracing::trace!(
            version = dataset.version,
            entries = dataset.rankings.len(),
            "loaded ranking dataset"
        );

        Ok(dataset)
    }
}

impl RankingService for JsonRankingService {
    fn fetch_rankings(&self, request: &RankingRequest) -> Result<Vec<RawRankingItem>> {
        let _span = tracing::debug_span!("json_fetch_rankings",
            query_type = %request.query_type,
            entity_type = %request.entity_type,
            country = ?request.country,
            state = ?request.state
        )
        .entered();

        let dataset = self.load()?;

        let Some(entry) = dataset.rankings.into_iter().find(|e| e.matches(request)) else {
            tracing::debug!("no dataset entry for request");
            return Ok(Vec::new());
        };

        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
        let mut items = entry.items;
        if items.len() > limit {
            tracing::debug!(available = items.len(), limit = limit, "truncating to limit");
            items.truncate(limit);
        }

        tracing::debug!(count = items.len(), "rankings served");
        Ok(items)
    }
}
