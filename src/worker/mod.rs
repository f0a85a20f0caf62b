//! Background fetch workers.
//!
//! - `messages`: ticket-tagged request/response protocol with trace propagation
//! - `handler`: executes one message against a [`RankingService`](crate::service::RankingService)
//! - `pool`: thread-per-request runtime delivering responses in completion order

pub mod handler;
pub mod messages;
pub mod pool;

pub use handler::RankingWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
pub use pool::WorkerPool;
