//! Span exporter writing one JSON object per finished span.
//!
//! Each line is self-contained so the trace log can be read with `jq` or grepped
//! without an OTLP collector:
//!
//! ```json
//! {"service":"ranktrail","traceId":"…","spanId":"…","parentSpanId":"…","name":"handle_message",
//!  "startTimeUnixNano":"…","durationMicros":412,"attributes":{"ticket":3},"events":[…],"status":"unset"}
//! ```

use super::rotation::RotatingFile;
use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct JsonLinesExporter {
    file: RotatingFile,
    service: String,
    is_shutdown: bool,
}

impl JsonLinesExporter {
    #[must_use]
    pub fn new(file: RotatingFile, resource: &Resource) -> Self {
        Self {
            file,
            service: service_name(resource),
            is_shutdown: false,
        }
    }

    fn format_span(&self, span: &SpanData) -> JsonValue {
        let duration = span
            .end_time
            .duration_since(span.start_time)
            .unwrap_or_default();

        let events: Vec<JsonValue> = span
            .events
            .iter()
            .map(|event| {
                json!({
                    "name": event.name,
                    "timeUnixNano": unix_nanos(event.timestamp),
                    "attributes": attributes_object(&event.attributes),
                })
            })
            .collect();

        let status = match &span.status {
            Status::Unset => json!("unset"),
            Status::Ok => json!("ok"),
            Status::Error { description } => json!({ "error": description.to_string() }),
        };

        json!({
            "service": self.service,
            "traceId": format!("{:032x}", span.span_context.trace_id()),
            "spanId": format!("{:016x}", span.span_context.span_id()),
            "parentSpanId": (span.parent_span_id != SpanId::INVALID)
                .then(|| format!("{:016x}", span.parent_span_id)),
            "name": span.name,
            "startTimeUnixNano": unix_nanos(span.start_time),
            "durationMicros": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
            "attributes": attributes_object(&span.attributes),
            "events": events,
            "status": status,
        })
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        if self.is_shutdown {
            return Box::pin(std::future::ready(Err(TraceError::from(
                "trace exporter is shut down",
            ))));
        }

        let result = batch
            .iter()
            .try_for_each(|span| self.file.write_line(&self.format_span(span).to_string()))
            .map_err(|e| TraceError::from(e.to_string()));

        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.service = service_name(resource);
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("file", &self.file)
            .field("service", &self.service)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a tracer provider exporting synchronously through [`JsonLinesExporter`].
#[must_use]
pub fn json_lines_provider(file: RotatingFile, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter::new(file, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

fn service_name(resource: &Resource) -> String {
    resource
        .iter()
        .find(|(key, _)| key.as_str() == "service.name")
        .map_or_else(|| "unknown".to_string(), |(_, value)| value.to_string())
}

fn unix_nanos(at: SystemTime) -> String {
    at.duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .to_string()
}

fn attributes_object(attributes: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_become_a_flat_object() {
        let attributes = vec![
            KeyValue::new("ticket", 3_i64),
            KeyValue::new("query_type", "coldest"),
            KeyValue::new("stale_available", true),
        ];

        assert_eq!(
            attributes_object(&attributes),
            json!({"ticket": 3, "query_type": "coldest", "stale_available": true})
        );
    }

    #[test]
    fn service_name_read_from_resource() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "ranktrail")]);
        assert_eq!(service_name(&resource), "ranktrail");
    }
}
