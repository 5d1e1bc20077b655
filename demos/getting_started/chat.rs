//! Chat - send one prompt to any chat backend
//!
//! To run this demo:
//! ```bash
//! cargo run --bin chat -- ollama "What is retrieval-augmented generation?"
//! cargo run --bin chat -- groq "Summarize RAG in one sentence" llama-3.3-70b-versatile
//! ```
//!
//! Set `RUST_LOG=debug` to see request-level logs.

use anyhow::{Result, bail};
use ragkit::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let provider = args.next().unwrap_or_else(|| "ollama".to_string());
    let prompt = args
        .next()
        .unwrap_or_else(|| "What is retrieval-augmented generation?".to_string());
    let model = args.next();

    let factory = LlmCall::new();
    let llm = match provider.as_str() {
        "azure_openai" | "azure" => factory.azure_openai(None).await?,
        "huggingface" | "hf" => factory.huggingface(model.as_deref(), None).await?,
        "groq" => factory.chat_groq(model.as_deref(), None).await?,
        "ollama" => factory.chat_ollama(model.as_deref(), None).await?,
        other => bail!("unknown provider {other}; expected azure_openai, huggingface, groq or ollama"),
    };

    let settings = llm.settings();
    info!(
        "Using {} model {} at temperature {}",
        settings.provider, settings.model, settings.temperature
    );

    let response = llm
        .chat(&[
            ChatMessage::system("You are a concise assistant."),
            ChatMessage::user(prompt),
        ])
        .await?;

    println!("{}", response.content);
    if let Some(usage) = response.usage {
        info!(
            "Tokens: {} prompt + {} completion",
            usage.prompt_tokens, usage.completion_tokens
        );
    }

    Ok(())
}
