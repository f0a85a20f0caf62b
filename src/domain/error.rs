//! Error types for ranktrail.
//!
//! This module defines the centralized error type [`RanktrailError`] and a type alias
//! [`Result`] used throughout the crate. Navigation itself never fails; errors only
//! originate at the fetch boundary (data service, worker) and at configuration load.
//!
//! [`FetchErrorKind`] is the coarse, serializable classification of a failed fetch that
//! travels back from the worker to the navigator and ends up in the view model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for ranktrail operations.
#[derive(Debug, Error)]
pub enum RanktrailError {
    /// The ranking data service answered, but reported a failure.
    #[error("Ranking service error: {0}")]
    Service(String),

    /// The ranking data service could not be reached or did not answer in time.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The ranking data service answered with a payload that could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Automatically converts from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with a background fetch worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

impl RanktrailError {
    /// Classifies this error into the kind reported alongside a failed fetch.
    ///
    /// I/O failures while reading a dataset are reported as transport failures: from the
    /// navigator's point of view the data source was unreachable.
    #[must_use]
    pub const fn fetch_kind(&self) -> FetchErrorKind {
        match self {
            Self::Service(_) | Self::Config(_) => FetchErrorKind::Service,
            Self::Transport(_) | Self::Io(_) => FetchErrorKind::Transport,
            Self::Malformed(_) => FetchErrorKind::Malformed,
            Self::Worker(_) => FetchErrorKind::Worker,
        }
    }
}

/// Why a ranking fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FetchErrorKind {
    /// Network, timeout, or unreadable data source.
    Transport,
    /// The response could not be decoded.
    Malformed,
    /// The service reported an error of its own.
    Service,
    /// The worker executing the fetch failed.
    Worker,
}

impl FetchErrorKind {
    /// Short user-facing description of the failure.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Transport => "Rankings service unreachable",
            Self::Malformed => "Rankings service sent an unreadable response",
            Self::Service => "Rankings service reported an error",
            Self::Worker => "Rankings request could not be completed",
        }
    }
}

/// A specialized `Result` type for ranktrail operations.
pub type Result<T> = std::result::Result<T, RanktrailError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_classify_as_transport() {
        let err = RanktrailError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.fetch_kind(), FetchErrorKind::Transport);
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn malformed_and_service_errors_keep_their_kind() {
        assert_eq!(
            RanktrailError::Malformed("bad json".into()).fetch_kind(),
            FetchErrorKind::Malformed
        );
        assert_eq!(
            RanktrailError::Service("503".into()).fetch_kind(),
            FetchErrorKind::Service
        );
    }
}
