//! Metric instrument factories for opik-telemetry.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"opik-telemetry"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for opik-telemetry instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("opik-telemetry")
}

/// Counter: chat requests sent to the model.
/// Labels: `model`, `result` ("ok" | "error").
pub fn chat_requests() -> Counter<u64> {
    meter()
        .u64_counter("opik.chat.requests")
        .with_description("Number of chat requests sent to the model")
        .build()
}

/// Histogram: chat call duration in milliseconds.
/// Labels: `model`.
pub fn chat_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("opik.chat.duration_ms")
        .with_description("Chat call duration in milliseconds")
        .with_unit("ms")
        .build()
}

/// Counter: observations copied onto a span.
/// Labels: `observation`.
pub fn observations_exported() -> Counter<u64> {
    meter()
        .u64_counter("opik.observations.exported")
        .with_description("Number of observations exported to the active span")
        .build()
}
