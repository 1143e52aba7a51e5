//! Flat JSON representation of a finished span.
//!
//! Each exported span becomes one [`SpanRecord`], serialized on a single line.
//! The shape is meant for `jq` and grep rather than for an OTLP collector:
//!
//! ```json
//! {"service":"roster","name":"gateway_search","traceId":"…","spanId":"…",
//!  "parentSpanId":"…","kind":"internal","startUnixNano":1700000000000000000,
//!  "durationMicros":412,"attributes":{"seq":3,"page":1},"events":[],"status":"unset"}
//! ```

use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, SystemTime};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    pub service: String,
    pub name: String,
    pub trace_id: String,
    pub span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub kind: &'static str,
    pub start_unix_nano: u64,
    pub duration_micros: u64,
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub events: Vec<EventRecord>,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    pub time_unix_nano: u64,
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl SpanRecord {
    pub fn from_span(service: &str, span: &SpanData) -> Self {
        let parent_span_id = (span.parent_span_id != SpanId::INVALID)
            .then(|| format!("{:016x}", span.parent_span_id));

        Self {
            service: service.to_string(),
            name: span.name.to_string(),
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id,
            kind: kind_name(&span.span_kind),
            start_unix_nano: unix_nanos(span.start_time),
            duration_micros: span
                .end_time
                .duration_since(span.start_time)
                .map_or(0, |d| saturate(d.as_micros())),
            attributes: attribute_map(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| EventRecord {
                    name: event.name.to_string(),
                    time_unix_nano: unix_nanos(event.timestamp),
                    attributes: attribute_map(&event.attributes),
                })
                .collect(),
            status: match &span.status {
                Status::Unset => "unset".to_string(),
                Status::Ok => "ok".to_string(),
                Status::Error { description } => format!("error: {description}"),
            },
        }
    }
}

const fn kind_name(kind: &SpanKind) -> &'static str {
    match kind {
        SpanKind::Internal => "internal",
        SpanKind::Server => "server",
        SpanKind::Client => "client",
        SpanKind::Producer => "producer",
        SpanKind::Consumer => "consumer",
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    saturate(
        time.duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos(),
    )
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

fn attribute_map(attributes: &[KeyValue]) -> BTreeMap<String, serde_json::Value> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

fn attribute_value(value: &Value) -> serde_json::Value {
    match value {
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::I64(i) => serde_json::Value::from(*i),
        Value::F64(f) => serde_json::Value::from(*f),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Array(_) => serde_json::Value::String(value.as_str().into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_values_keep_their_json_type() {
        let attributes = vec![
            KeyValue::new("seq", 3_i64),
            KeyValue::new("has_more", true),
            KeyValue::new("platform", "youtube"),
        ];
        let map = attribute_map(&attributes);

        assert_eq!(map["seq"], serde_json::json!(3));
        assert_eq!(map["has_more"], serde_json::json!(true));
        assert_eq!(map["platform"], serde_json::json!("youtube"));
    }

    #[test]
    fn times_before_epoch_clamp_to_zero() {
        let before = SystemTime::UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(unix_nanos(before), 0);
    }
}
