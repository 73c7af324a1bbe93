//! In-memory OTel export for asserting span attributes.

#![allow(dead_code)]

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{Array, Value};
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use tracing_subscriber::layer::SubscriberExt as _;

pub struct OtelCapture {
    pub exporter: InMemorySpanExporter,
    pub provider: SdkTracerProvider,
    _guard: tracing::subscriber::DefaultGuard,
}

impl OtelCapture {
    /// Install a thread-local subscriber that exports tracing spans to memory.
    pub fn install() -> Self {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let layer = tracing_opentelemetry::layer().with_tracer(provider.tracer("test"));
        let subscriber = tracing_subscriber::registry().with(layer);
        let guard = tracing::subscriber::set_default(subscriber);
        Self {
            exporter,
            provider,
            _guard: guard,
        }
    }

    pub fn finished_spans(&self) -> Vec<SpanData> {
        let _ = self.provider.force_flush();
        self.exporter.get_finished_spans().unwrap()
    }

    pub fn span(&self, name: &str) -> SpanData {
        self.finished_spans()
            .into_iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("no exported span named {name}"))
    }
}

pub fn attribute<'a>(span: &'a SpanData, key: &str) -> Option<&'a Value> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| &kv.value)
}

pub fn string_attribute(span: &SpanData, key: &str) -> Option<String> {
    attribute(span, key).map(|v| v.as_str().into_owned())
}

pub fn string_list_attribute(span: &SpanData, key: &str) -> Option<Vec<String>> {
    match attribute(span, key)? {
        Value::Array(Array::String(values)) => {
            Some(values.iter().map(|v| v.as_str().to_string()).collect())
        }
        _ => None,
    }
}

pub fn keys_with_prefix(span: &SpanData, prefix: &str) -> Vec<String> {
    span.attributes
        .iter()
        .map(|kv| kv.key.as_str().to_string())
        .filter(|k| k.starts_with(prefix))
        .collect()
}
