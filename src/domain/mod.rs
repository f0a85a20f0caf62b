//! Domain layer for ranktrail.
//!
//! Core types and pure rules, independent of the worker runtime and of any transport.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`ranking`]: Ranked entity model and boundary normalization
//! - [`category`]: Categories, sub-filters and the catalog
//! - [`resolver`]: Category/sub-filter → query type and entity type resolution

pub mod category;
pub mod error;
pub mod ranking;
pub mod resolver;

pub use category::{Category, CategoryCatalog, SubFilterConfig};
pub use error::{FetchErrorKind, RanktrailError, Result};
pub use ranking::{RankingItem, RawRankingItem, Trend};
pub use resolver::{resolve_entity_type, resolve_query_type};
