//! opik-chat: ask a chat model a question with Opik-traced telemetry.

use std::collections::BTreeMap;

use clap::{Parser, Subcommand};
use opik_telemetry::config::Config;
use opik_telemetry::llm::RigChatClient;
use opik_telemetry::service::{ChatRequest, ChatService};
use opik_telemetry::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "opik-chat", about = "Traced chat calls with Opik annotations")]
struct Cli {
    /// Override the model from CHAT_MODEL
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a plain question
    Ask {
        #[arg(default_value = "Tell me a joke")]
        question: String,
    },
    /// Ask a question and tag the trace
    AskEnhanced {
        question: String,
        /// Opik tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Opik metadata entry as key=value (repeatable)
        #[arg(long = "meta", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,
    },
    /// Ask using a JSON request: {"question": ..., "tags": [...], "metadata": {...}}
    AskJson { request: String },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty metadata key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let guard = init_telemetry(TelemetryConfig::from_config(&config))?;

    let model = cli.model.unwrap_or_else(|| config.chat_model.clone());
    let client = RigChatClient::anthropic(&config.anthropic_api_key, model)?;
    let service = ChatService::new(client);

    let answer = match cli.command {
        Command::Ask { question } => service.ask_question(&question).await,
        Command::AskEnhanced {
            question,
            tags,
            metadata,
        } => {
            let metadata: BTreeMap<String, String> = metadata.into_iter().collect();
            service
                .ask_question_annotated(&question, Some(tags.as_slice()), Some(&metadata))
                .await
        }
        Command::AskJson { request } => {
            let request: ChatRequest = serde_json::from_str(&request)?;
            service.ask_request(&request).await
        }
    };
    guard.force_flush();

    println!("{}", answer?);
    Ok(())
}
