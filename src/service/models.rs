//! Wire request model for the ranking data service.
//!
//! [`RankingQuery`] is what the navigator derives from its state; [`RankingRequest`] is the
//! same information in the service's wire shape:
//!
//! ```json
//! { "type": "coldest", "entityType": "city", "country": "Japan", "limit": 20, "language": "en" }
//! ```

use crate::app::drill::DrillLevel;
use crate::app::fetcher::FetchKey;
use serde::{Deserialize, Serialize};

/// Resolved ranking query. Built only by the navigator, never by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankingQuery {
    pub level: DrillLevel,
    pub query_type: String,
    pub entity_type: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub limit: u32,
    pub locale: String,
}

impl RankingQuery {
    /// Fetch identity of this query.
    #[must_use]
    pub fn key(&self) -> FetchKey {
        FetchKey {
            level: self.level,
            query_type: self.query_type.clone(),
            entity_type: self.entity_type.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
        }
    }

    /// Wire request for this query.
    #[must_use]
    pub fn to_request(&self) -> RankingRequest {
        RankingRequest {
            query_type: self.query_type.clone(),
            entity_type: self.entity_type.clone(),
            country: self.country.clone(),
            state: self.state.clone(),
            limit: self.limit,
            language: self.locale.clone(),
        }
    }
}

/// Ranking request as sent to the data service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRequest {
    #[serde(rename = "type")]
    pub query_type: String,
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub limit: u32,
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_service_field_names() {
        let query = RankingQuery {
            level: DrillLevel::Country,
            query_type: "coldest".into(),
            entity_type: "city".into(),
            country: Some("Japan".into()),
            state: None,
            limit: 20,
            locale: "en".into(),
        };

        let json = serde_json::to_value(query.to_request()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "coldest",
                "entityType": "city",
                "country": "Japan",
                "limit": 20,
                "language": "en"
            })
        );
    }
}
