//! Export of stopped observations onto the active tracing span.

use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use crate::observation::{ObservationContext, ObservationHandler};

use super::metrics;

/// Copies an observation's key values onto [`tracing::Span::current`].
///
/// With a `tracing-opentelemetry` layer installed the values end up as
/// attributes on the exported OTel span. Does nothing when there is no
/// current span.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservationHandler;

impl TracingObservationHandler {
    pub fn new() -> Self {
        Self
    }
}

impl ObservationHandler for TracingObservationHandler {
    fn on_stop(&self, context: &ObservationContext) {
        let span = tracing::Span::current();
        if span.is_disabled() {
            tracing::debug!(
                observation = context.name(),
                "no active span, observation not exported"
            );
            return;
        }

        for (key, value) in context
            .low_cardinality()
            .iter()
            .chain(context.high_cardinality().iter())
        {
            span.set_attribute(key.to_string(), value.to_string());
        }

        metrics::observations_exported().add(
            1,
            &[opentelemetry::KeyValue::new(
                "observation",
                context.name().to_string(),
            )],
        );
    }
}
