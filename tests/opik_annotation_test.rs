//! Opik tags and metadata end up on exported OTel spans.

mod common;

use std::collections::BTreeMap;

use common::{OtelCapture, keys_with_prefix, string_attribute, string_list_attribute};
use opentelemetry::trace::{TraceContextExt as _, Tracer as _, TracerProvider as _};
use opik_telemetry::telemetry::opik::{set_metadata, set_tags};

fn tags(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn tags_and_metadata_on_tracing_span() {
    let capture = OtelCapture::install();

    {
        let mut span = tracing::info_span!("chat");
        let tags = tags(&["math", "arithmetic"]);
        let metadata = BTreeMap::from([("user".to_string(), "alice".to_string())]);
        set_tags(&mut span, Some(tags.as_slice()));
        set_metadata(&mut span, Some(&metadata));
    }

    let span = capture.span("chat");
    assert_eq!(
        string_list_attribute(&span, "opik.tags"),
        Some(tags(&["math", "arithmetic"]))
    );
    assert_eq!(
        string_attribute(&span, "opik.metadata.user").as_deref(),
        Some("alice")
    );
}

#[test]
fn metadata_gives_one_attribute_per_entry() {
    let capture = OtelCapture::install();

    {
        let mut span = tracing::info_span!("chat");
        let metadata = BTreeMap::from([
            ("user".to_string(), "alice".to_string()),
            ("session".to_string(), "s-42".to_string()),
            ("tier".to_string(), "free".to_string()),
        ]);
        set_metadata(&mut span, Some(&metadata));
    }

    let span = capture.span("chat");
    let mut keys = keys_with_prefix(&span, "opik.metadata.");
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "opik.metadata.session",
            "opik.metadata.tier",
            "opik.metadata.user",
        ]
    );
}

#[test]
fn empty_annotations_leave_span_untouched() {
    let capture = OtelCapture::install();

    {
        let mut span = tracing::info_span!("chat");
        let no_tags: Vec<String> = Vec::new();
        set_tags(&mut span, None);
        set_tags(&mut span, Some(no_tags.as_slice()));
        set_metadata(&mut span, None);
        set_metadata(&mut span, Some(&BTreeMap::new()));
    }

    let span = capture.span("chat");
    assert!(keys_with_prefix(&span, "opik.").is_empty());
}

#[test]
fn tags_on_otel_api_span() {
    let capture = OtelCapture::install();
    let tracer = capture.provider.tracer("direct");

    tracer.in_span("direct", |cx| {
        let mut span = cx.span();
        let tags = tags(&["a"]);
        set_tags(&mut span, Some(tags.as_slice()));
    });

    let span = capture.span("direct");
    assert_eq!(string_list_attribute(&span, "opik.tags"), Some(tags(&["a"])));
}

#[test]
fn metadata_on_global_boxed_span() {
    use opentelemetry::trace::Span as _;

    let capture = OtelCapture::install();
    opentelemetry::global::set_tracer_provider(capture.provider.clone());

    let mut span = opentelemetry::global::tracer("boxed").start("boxed");
    let metadata = BTreeMap::from([("run".to_string(), "7".to_string())]);
    set_metadata(&mut span, Some(&metadata));
    span.end();

    let span = capture.span("boxed");
    assert_eq!(string_attribute(&span, "opik.metadata.run").as_deref(), Some("7"));
}
