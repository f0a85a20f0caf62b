//! Subscriber setup: `EnvFilter` + OpenTelemetry layer + optional stderr output.

use super::exporter::json_lines_provider;
use super::rotation::RotatingFile;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the span log inside the data directory.
pub const TRACE_FILE_NAME: &str = "ranktrail-trace.jsonl";

/// Installs the global subscriber.
///
/// The filter comes from `config.trace_level` (default `"info"`). Spans are exported as
/// JSON lines to [`TRACE_FILE_NAME`] in the data directory; with `config.log_to_stderr`
/// events are also printed to stderr.
///
/// Returns the span log path, or `None` if the data directory could not be created. Only
/// the first successful call installs a subscriber.
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return None;
    }

    let trace_file = data_dir.join(TRACE_FILE_NAME);
    let resource = Resource::new(vec![
        opentelemetry::KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
        opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = json_lines_provider(RotatingFile::new(trace_file.clone()), resource);

    let stderr_layer = config
        .log_to_stderr
        .then(|| fmt::layer().with_writer(std::io::stderr).with_target(false));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(OpenTelemetryLayer::new(provider.tracer(env!("CARGO_PKG_NAME"))))
        .with(stderr_layer)
        .try_init();

    Some(trace_file)
}
