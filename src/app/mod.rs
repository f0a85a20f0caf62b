//! Application layer coordinating navigation state, events, and actions.
//!
//! ```text
//! User Input → Events → handle_event → NavigatorState → Actions → WorkerPool
//!                           ↑                                         ↓
//!                           └──────────── WorkerResponse ─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`drill`]: Global → country → city drill-down state machine
//! - [`fetcher`]: Stale-while-revalidate fetch lifecycle with superseded-response discard
//! - [`handler`]: Event processing and state transition coordinator
//! - [`state`]: Navigator state container and view model computation

pub mod actions;
pub mod drill;
pub mod fetcher;
pub mod handler;
pub mod state;

pub use actions::Action;
pub use drill::{DrillLevel, DrillState, GLOBAL_BREADCRUMB};
pub use fetcher::{FetchKey, FetchTicket, LoadedRankings, RankingFetcher, RankingResult};
pub use handler::{handle_event, Event};
pub use state::{NavigatorSettings, NavigatorState};
