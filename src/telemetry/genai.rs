//! GenAI semantic convention keys and span helpers for chat calls.
//!
//! Uses OpenTelemetry GenAI semantic conventions:
//! - `gen_ai.operation.name`
//! - `gen_ai.request.model`
//! - `gen_ai.provider.name`
//! - `gen_ai.prompt` / `gen_ai.completion` (full prompt and completion text)

use tracing::Span;

/// Name of the operation being performed.
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// Model the request targets.
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// Provider serving the model, e.g. `anthropic`.
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// Concatenated prompt text sent to the model.
pub const GEN_AI_PROMPT: &str = "gen_ai.prompt";

/// Concatenated completion text returned by the model.
pub const GEN_AI_COMPLETION: &str = "gen_ai.completion";

/// Operation name value for chat completions.
pub const OP_CHAT: &str = "chat";

/// Start a span for a chat/completion operation.
pub fn start_chat_span(model: &str, provider: &str) -> Span {
    tracing::info_span!(
        "gen_ai.chat",
        "gen_ai.operation.name" = OP_CHAT,
        "gen_ai.request.model" = model,
        "gen_ai.provider.name" = provider,
    )
}
