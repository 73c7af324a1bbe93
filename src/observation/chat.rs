//! Chat request/response shapes carried by a chat-model observation.
//!
//! These mirror what a chat client hands to the observation layer once a
//! call returns: the prompt that was sent and, if the call produced one,
//! the response with its candidate generations.

use serde::{Deserialize, Serialize};

use super::KeyValues;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Who authored a message in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    System,
    User,
    Assistant,
}

/// One instruction in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_type: MessageType,
    /// Message content. May be empty.
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            message_type: MessageType::Assistant,
            text: text.into(),
        }
    }
}

/// The ordered instructions sent to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub instructions: Vec<Message>,
    /// Requested model, if the caller pinned one.
    #[serde(default)]
    pub model: Option<String>,
}

impl Prompt {
    /// A prompt holding a single user message.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            instructions: vec![Message::user(question)],
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Text of the last user message, or `""` when there is none.
    pub fn user_text(&self) -> &str {
        self.instructions
            .iter()
            .rev()
            .find(|m| m.message_type == MessageType::User)
            .map_or("", |m| m.text.as_str())
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Output message of a single generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub text: Option<String>,
}

impl AssistantMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// One candidate result returned by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    #[serde(default)]
    pub output: Option<AssistantMessage>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            output: Some(AssistantMessage::new(text)),
        }
    }

    /// A generation that produced no output message.
    pub fn empty() -> Self {
        Self { output: None }
    }

    /// Output text, if any.
    pub fn text(&self) -> Option<&str> {
        self.output.as_ref()?.text.as_deref()
    }
}

/// Everything the model returned for one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub results: Vec<Generation>,
}

impl ChatResponse {
    pub fn new(results: Vec<Generation>) -> Self {
        Self { results }
    }

    /// The first generation, if any.
    pub fn result(&self) -> Option<&Generation> {
        self.results.first()
    }

    /// Text of the first generation, or `""`.
    pub fn content(&self) -> &str {
        self.result().and_then(Generation::text).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Observation context
// ---------------------------------------------------------------------------

/// Observation of a single chat-model invocation.
#[derive(Debug, Clone)]
pub struct ChatModelObservationContext {
    pub request: Prompt,
    /// `None` when the call produced no response.
    pub response: Option<ChatResponse>,
    /// Provider name, e.g. `anthropic`.
    pub provider: String,
    pub low_cardinality: KeyValues,
    pub high_cardinality: KeyValues,
}

impl ChatModelObservationContext {
    pub fn new(request: Prompt, provider: impl Into<String>) -> Self {
        Self {
            request,
            response: None,
            provider: provider.into(),
            low_cardinality: KeyValues::default(),
            high_cardinality: KeyValues::default(),
        }
    }

    pub fn with_response(mut self, response: ChatResponse) -> Self {
        self.response = Some(response);
        self
    }

    pub fn add_low_cardinality_key_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.low_cardinality.push(key, value);
    }

    pub fn add_high_cardinality_key_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.high_cardinality.push(key, value);
    }
}
