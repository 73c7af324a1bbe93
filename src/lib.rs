//! # opik-telemetry
//!
//! Telemetry glue between chat-model calls and an OpenTelemetry pipeline
//! read by Opik.
//!
//! - [`observation::filter::ChatModelObservationFilter`] records the prompt
//!   and completion text of every chat-model observation as
//!   `gen_ai.prompt` / `gen_ai.completion`.
//! - [`telemetry::opik`] writes caller tags and metadata onto a span as
//!   `opik.tags` and `opik.metadata.<key>`.
//! - [`service::ChatService`] wires both around a [`llm::ChatClient`] call.

pub mod config;
pub mod error;
pub mod llm;
pub mod observation;
pub mod service;
pub mod telemetry;
