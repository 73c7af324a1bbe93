//! Chat service: one traced, annotated, observed model call per question.
//!
//! Each call opens a `gen_ai.chat` span, optionally tags it with caller
//! supplied Opik tags and metadata, sends the question to the chat client,
//! and stops a chat-model observation through the registry so filters can
//! enrich it and handlers can export it while the span is still current.

use std::collections::BTreeMap;
use std::time::Instant;

use opentelemetry::KeyValue;
use serde::{Deserialize, Serialize};
use tracing::Instrument as _;

use crate::error::Result;
use crate::llm::ChatClient;
use crate::observation::chat::{ChatModelObservationContext, Prompt};
use crate::observation::filter::ChatModelObservationFilter;
use crate::observation::{ObservationContext, ObservationRegistry};
use crate::telemetry::genai::{
    self, GEN_AI_OPERATION_NAME, GEN_AI_PROVIDER_NAME, GEN_AI_REQUEST_MODEL, OP_CHAT,
};
use crate::telemetry::handler::TracingObservationHandler;
use crate::telemetry::{metrics, opik};

/// Question plus optional Opik annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }
}

/// The registry used by [`ChatService::new`]: prompt/completion enrichment
/// followed by export onto the current span.
pub fn default_registry() -> ObservationRegistry {
    ObservationRegistry::new()
        .with_filter(ChatModelObservationFilter::new())
        .with_handler(TracingObservationHandler::new())
}

pub struct ChatService<C> {
    client: C,
    registry: ObservationRegistry,
}

impl<C: ChatClient> ChatService<C> {
    pub fn new(client: C) -> Self {
        Self::with_registry(client, default_registry())
    }

    pub fn with_registry(client: C, registry: ObservationRegistry) -> Self {
        Self { client, registry }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Ask a question without annotations.
    pub async fn ask_question(&self, question: &str) -> Result<String> {
        self.ask(question, None, None).await
    }

    /// Ask a question, tagging the chat span with Opik tags and metadata.
    pub async fn ask_question_annotated(
        &self,
        question: &str,
        tags: Option<&[String]>,
        metadata: Option<&BTreeMap<String, String>>,
    ) -> Result<String> {
        self.ask(question, Some(tags), Some(metadata)).await
    }

    pub async fn ask_request(&self, request: &ChatRequest) -> Result<String> {
        self.ask_question_annotated(
            &request.question,
            request.tags.as_deref(),
            request.metadata.as_ref(),
        )
        .await
    }

    // Outer `None` means no annotation step at all.
    async fn ask(
        &self,
        question: &str,
        tags: Option<Option<&[String]>>,
        metadata: Option<Option<&BTreeMap<String, String>>>,
    ) -> Result<String> {
        let model = self.client.default_model().to_string();
        let provider = self.client.provider().to_string();
        let mut span = genai::start_chat_span(&model, &provider);

        if !span.is_disabled() {
            if let Some(tags) = tags {
                opik::set_tags(&mut span, tags);
            }
            if let Some(metadata) = metadata {
                opik::set_metadata(&mut span, metadata);
            }
        }

        let prompt = Prompt::new(question).with_model(&model);
        self.observe_call(prompt, &model, &provider)
            .instrument(span)
            .await
    }

    async fn observe_call(&self, prompt: Prompt, model: &str, provider: &str) -> Result<String> {
        let started = Instant::now();
        let outcome = self.client.call(&prompt).await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let result_label = if outcome.is_ok() { "ok" } else { "error" };
        metrics::chat_requests().add(
            1,
            &[
                KeyValue::new("model", model.to_string()),
                KeyValue::new("result", result_label),
            ],
        );
        metrics::chat_duration_ms().record(elapsed_ms, &[KeyValue::new("model", model.to_string())]);

        let mut context = ChatModelObservationContext::new(prompt, provider);
        context.add_low_cardinality_key_value(GEN_AI_OPERATION_NAME, OP_CHAT);
        context.add_low_cardinality_key_value(GEN_AI_PROVIDER_NAME, provider);
        context.add_low_cardinality_key_value(GEN_AI_REQUEST_MODEL, model);

        // A failed call is still observed, with no response.
        let content = match outcome {
            Ok(response) => {
                let content = response.content().to_string();
                context.response = Some(response);
                Ok(content)
            }
            Err(e) => {
                tracing::warn!(error = %e, "chat call failed");
                Err(e)
            }
        };

        self.registry.stop(ObservationContext::ChatModel(context));

        if content.is_ok() {
            tracing::debug!(elapsed_ms, "chat call completed");
        }
        content
    }
}
