//! Chat client abstraction and the rig-core backed implementation.
//!
//! [`ChatClient`] is the seam between the chat service and whatever
//! actually talks to the model. [`RigChatClient`] drives an Anthropic
//! model through rig-core.
//!
//! # Example
//! ```no_run
//! use opik_telemetry::llm::{ChatClient, RigChatClient};
//! use opik_telemetry::observation::chat::Prompt;
//! use secrecy::SecretString;
//!
//! # async fn run() -> opik_telemetry::error::Result<()> {
//! let key = SecretString::from("sk-ant-...");
//! let client = RigChatClient::anthropic(&key, "claude-sonnet-4-20250514")?;
//! let response = client.call(&Prompt::new("Tell me a joke")).await?;
//! println!("{}", response.content());
//! # Ok(())
//! # }
//! ```

use rig::client::CompletionClient as _;
use rig::completion::Prompt as _;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};
use crate::observation::chat::{ChatResponse, Generation, MessageType, Prompt};

/// Something that can send a prompt to a chat model.
///
/// Implementations may write `async fn call`; the returned future must be
/// `Send` so service calls can run on spawned tasks.
pub trait ChatClient: Send + Sync {
    /// Provider name reported in telemetry, e.g. `anthropic`.
    fn provider(&self) -> &str;

    /// Model used when the prompt does not pin one.
    fn default_model(&self) -> &str;

    /// Send `prompt` and wait for the model's response.
    fn call(&self, prompt: &Prompt) -> impl Future<Output = Result<ChatResponse>> + Send;
}

/// Create an Anthropic client from a secret API key.
///
/// # Errors
/// Returns an error if the underlying HTTP client cannot be constructed.
pub fn anthropic_client(api_key: &SecretString) -> Result<rig::providers::anthropic::Client> {
    rig::providers::anthropic::Client::new(api_key.expose_secret())
        .map_err(|e| Error::Llm(format!("failed to create Anthropic client: {e}")))
}

/// [`ChatClient`] over a rig-core Anthropic client.
pub struct RigChatClient {
    client: rig::providers::anthropic::Client,
    model: String,
}

impl RigChatClient {
    pub fn new(client: rig::providers::anthropic::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn anthropic(api_key: &SecretString, model: impl Into<String>) -> Result<Self> {
        Ok(Self::new(anthropic_client(api_key)?, model))
    }
}

impl ChatClient for RigChatClient {
    fn provider(&self) -> &str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    async fn call(&self, prompt: &Prompt) -> Result<ChatResponse> {
        let model = prompt.model.as_deref().unwrap_or(&self.model);

        // System messages become the agent preamble; the last user
        // message is the prompt itself.
        let preamble: Vec<&str> = prompt
            .instructions
            .iter()
            .filter(|m| m.message_type == MessageType::System)
            .map(|m| m.text.as_str())
            .collect();

        let mut builder = self.client.agent(model);
        if !preamble.is_empty() {
            builder = builder.preamble(&preamble.join("\n"));
        }
        let agent = builder.build();

        let text = agent
            .prompt(prompt.user_text())
            .await
            .map_err(|e| Error::Llm(e.to_string()))?;

        Ok(ChatResponse::new(vec![Generation::new(text)]))
    }
}
