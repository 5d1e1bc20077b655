//! Integration tests for factory-level behavior shared by every backend.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use ragkit_core::RagkitError;
use ragkit_core::config::{ChatBackend, EmbeddingBackend, MapEnv, vars};
use ragkit_core::factory::{EmbedderFactory, LlmFactory};
use ragkit_integrations::{Embeddings, LlmCall};
use test_case::test_case;

fn full_env() -> MapEnv {
    MapEnv::new()
        .with(vars::AZURE_OPENAI_ENDPOINT, "https://res.openai.azure.com")
        .with(vars::AZURE_OPENAI_API_KEY, "key")
        .with(vars::AZURE_OPENAI_CHAT_DEPLOYMENT_NAME, "gpt-4o")
        .with(vars::AZURE_OPENAI_CHAT_API_VERSION, "2024-02-01")
        .with(vars::AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME, "embed-small")
        .with(vars::AZURE_OPENAI_EMBEDDING_API_VERSION, "2023-05-15")
        .with(vars::GROQ_API_KEY, "gsk_test")
}

#[test_case(ChatBackend::azure_openai() ; "azure")]
#[test_case(ChatBackend::groq() ; "groq")]
#[test_case(ChatBackend::ollama() ; "ollama")]
#[tokio::test]
async fn test_each_call_returns_an_independent_client(backend: ChatBackend) {
    let llm = LlmCall::with_env(Arc::new(full_env()));

    let first = llm.create(&backend).await.unwrap();
    let second = llm.create(&backend).await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.settings(), second.settings());
}

#[tokio::test]
async fn test_independent_embedders() {
    let embeddings = Embeddings::with_env(Arc::new(full_env()));

    let first = embeddings.azure_openai().await.unwrap();
    let second = embeddings.azure_openai().await.unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_huggingface_chat_without_token_fails_before_download() {
    let err = LlmCall::with_env(Arc::new(full_env()))
        .huggingface(None, None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, RagkitError::Authentication { .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_huggingface_chat_empty_token_counts_as_missing() {
    let env = full_env().with(vars::HUGGINGFACE_TOKEN, "");
    let err = LlmCall::with_env(Arc::new(env))
        .huggingface(Some("google/gemma-2b-it"), Some(0.2))
        .await
        .unwrap_err();

    assert!(matches!(err, RagkitError::Authentication { .. }));
}

#[tokio::test]
async fn test_backends_deserialize_from_json() {
    let llm = LlmCall::with_env(Arc::new(full_env()));
    let backend: ChatBackend = serde_json::from_str(
        r#"{"provider": "groq", "model": "mixtral-8x7b-32768", "temperature": 0.1}"#,
    )
    .unwrap();

    let client = llm.create_llm(&backend).await.unwrap();
    assert_eq!(client.settings().model, "mixtral-8x7b-32768");

    let embedding: EmbeddingBackend =
        serde_json::from_str(r#"{"provider": "azure_openai"}"#).unwrap();
    let embedder = Embeddings::with_env(Arc::new(full_env()))
        .create_embedder(&embedding)
        .await
        .unwrap();
    assert_eq!(embedder.model_name(), "text-embedding-3-small");
}

#[test]
fn test_supported_providers() {
    let llm = LlmCall::with_env(Arc::new(MapEnv::new()));
    let embeddings = Embeddings::with_env(Arc::new(MapEnv::new()));

    let chat = llm.supported_providers();
    assert!(chat.contains(&"azure_openai"));
    assert!(chat.contains(&"groq"));
    assert!(chat.contains(&"ollama"));
    assert!(embeddings.supported_providers().contains(&"azure_openai"));
}
