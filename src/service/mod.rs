//! Ranking data service boundary.
//!
//! # Modules
//!
//! - `backend`: [`RankingService`] trait implemented by data sources
//! - `json`: JSON dataset file implementation
//! - `models`: Navigator query and wire request types

pub mod backend;
pub mod json;
pub mod models;

pub use backend::RankingService;
pub use json::JsonRankingService;
pub use models::{RankingQuery, RankingRequest};
