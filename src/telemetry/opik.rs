//! Opik span annotations.
//!
//! Opik reads trace tags from the `opik.tags` attribute and free-form
//! metadata from attributes prefixed with `opik.metadata.`. The helpers
//! here write caller-supplied tags and metadata onto a span using that
//! convention.
//!
//! Callers must hand in a live span. Neither helper checks whether the
//! span is recording; use [`tracing::Span::is_disabled`] (or the OTel
//! equivalent) before calling if that matters.

use std::collections::BTreeMap;

use opentelemetry::trace::{Span as _, SpanRef};
use opentelemetry::{Array, KeyValue, StringValue, Value};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

/// Attribute holding the list of tags.
pub const TAGS_KEY: &str = "opik.tags";

/// Prefix for per-entry metadata attributes.
pub const METADATA_PREFIX: &str = "opik.metadata.";

/// A span that accepts string and string-list attributes.
pub trait SpanTagger {
    fn tag(&mut self, key: String, value: String);

    fn tag_of_strings(&mut self, key: String, values: Vec<String>);
}

fn string_array(values: Vec<String>) -> Value {
    Value::Array(Array::String(
        values.into_iter().map(StringValue::from).collect(),
    ))
}

impl SpanTagger for tracing::Span {
    fn tag(&mut self, key: String, value: String) {
        self.set_attribute(key, value);
    }

    fn tag_of_strings(&mut self, key: String, values: Vec<String>) {
        self.set_attribute(key, string_array(values));
    }
}

impl SpanTagger for SpanRef<'_> {
    fn tag(&mut self, key: String, value: String) {
        self.set_attribute(KeyValue::new(key, value));
    }

    fn tag_of_strings(&mut self, key: String, values: Vec<String>) {
        self.set_attribute(KeyValue::new(key, string_array(values)));
    }
}

impl SpanTagger for opentelemetry::global::BoxedSpan {
    fn tag(&mut self, key: String, value: String) {
        self.set_attribute(KeyValue::new(key, value));
    }

    fn tag_of_strings(&mut self, key: String, values: Vec<String>) {
        self.set_attribute(KeyValue::new(key, string_array(values)));
    }
}

/// Attach `tags` to `span` as a single `opik.tags` string-list attribute.
///
/// Does nothing when `tags` is `None` or empty.
pub fn set_tags<S: SpanTagger + ?Sized>(span: &mut S, tags: Option<&[String]>) {
    let Some(tags) = tags.filter(|t| !t.is_empty()) else {
        return;
    };
    span.tag_of_strings(TAGS_KEY.to_string(), tags.to_vec());
}

/// Attach each metadata entry to `span` as `opik.metadata.<key>`.
///
/// Does nothing when `metadata` is `None` or empty.
pub fn set_metadata<S: SpanTagger + ?Sized>(
    span: &mut S,
    metadata: Option<&BTreeMap<String, String>>,
) {
    let Some(metadata) = metadata else {
        return;
    };
    for (key, value) in metadata {
        span.tag(format!("{METADATA_PREFIX}{key}"), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        strings: Vec<(String, String)>,
        lists: Vec<(String, Vec<String>)>,
    }

    impl SpanTagger for Recorder {
        fn tag(&mut self, key: String, value: String) {
            self.strings.push((key, value));
        }

        fn tag_of_strings(&mut self, key: String, values: Vec<String>) {
            self.lists.push((key, values));
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tags_written_as_one_list_in_order() {
        let mut span = Recorder::default();
        let tags = strings(&["math", "arithmetic"]);
        set_tags(&mut span, Some(tags.as_slice()));

        assert_eq!(
            span.lists,
            vec![("opik.tags".to_string(), strings(&["math", "arithmetic"]))]
        );
        assert!(span.strings.is_empty());
    }

    #[test]
    fn absent_or_empty_tags_write_nothing() {
        let mut span = Recorder::default();
        let empty: Vec<String> = Vec::new();
        set_tags(&mut span, None);
        set_tags(&mut span, Some(empty.as_slice()));
        assert!(span.lists.is_empty());
        assert!(span.strings.is_empty());
    }

    #[test]
    fn metadata_entry_per_key_with_prefix() {
        let mut span = Recorder::default();
        let metadata = BTreeMap::from([
            ("user".to_string(), "alice".to_string()),
            ("session".to_string(), "s-1".to_string()),
        ]);
        set_metadata(&mut span, Some(&metadata));

        assert_eq!(
            span.strings,
            vec![
                ("opik.metadata.session".to_string(), "s-1".to_string()),
                ("opik.metadata.user".to_string(), "alice".to_string()),
            ]
        );
    }

    #[test]
    fn absent_or_empty_metadata_write_nothing() {
        let mut span = Recorder::default();
        set_metadata(&mut span, None);
        set_metadata(&mut span, Some(&BTreeMap::new()));
        assert!(span.strings.is_empty());
    }
}
