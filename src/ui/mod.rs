//! Presentation-facing types.
//!
//! Rendering itself lives outside this crate; the [`viewmodel`] module is the contract a
//! renderer consumes.

pub mod viewmodel;

pub use viewmodel::{
    DisplayRow, EmptyState, ErrorState, HeaderInfo, ListBody, RankingsViewModel, SearchBarInfo,
    SubFilterTab,
};
