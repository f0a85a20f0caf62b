//! Tracing setup with OpenTelemetry spans exported to a local JSON-lines file.
//!
//! ```text
//! tracing → tracing-opentelemetry → opentelemetry_sdk TracerProvider → JsonLinesExporter → RotatingFile
//! ```
//!
//! Spans are written to `<data_dir>/ranktrail-trace.jsonl`, one span per line, rotated at
//! 8 MiB with three numbered backups. Worker spans join the trace of the navigation event
//! that issued the fetch (see [`TraceContext`](crate::worker::TraceContext)).
//!
//! ```no_run
//! use ranktrail::observability::init_tracing;
//! use ranktrail::Config;
//!
//! let config = Config {
//!     trace_level: Some("debug".to_string()),
//!     ..Default::default()
//! };
//! if let Some(path) = init_tracing(&config) {
//!     tracing::debug!(trace_file = ?path, "tracing is now active");
//! }
//! ```

mod exporter;
mod init;
mod rotation;

pub use exporter::{json_lines_provider, JsonLinesExporter};
pub use init::{init_tracing, TRACE_FILE_NAME};
pub use rotation::RotatingFile;
