//! Integration tests for the Azure OpenAI chat and embedding clients.
//!
//! A local wiremock server stands in for the Azure resource, so these run
//! without network access or credentials.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use ragkit_core::config::{MapEnv, vars};
use ragkit_core::{ChatMessage, RagkitError};
use ragkit_integrations::{Embeddings, LlmCall};
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "azure-test-key";

fn azure_env(endpoint: &str) -> MapEnv {
    MapEnv::new()
        .with(vars::AZURE_OPENAI_ENDPOINT, endpoint)
        .with(vars::AZURE_OPENAI_API_KEY, API_KEY)
        .with(vars::AZURE_OPENAI_CHAT_DEPLOYMENT_NAME, "gpt-4o")
        .with(vars::AZURE_OPENAI_CHAT_API_VERSION, "2024-02-01")
        .with(vars::AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME, "embed-small")
        .with(vars::AZURE_OPENAI_EMBEDDING_API_VERSION, "2023-05-15")
}

#[tokio::test]
async fn test_azure_chat_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o/chat/completions"))
        .and(query_param("api-version", "2024-02-01"))
        .and(header("api-key", API_KEY))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "What is RAG?"}
            ],
            "temperature": 0.4
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-2024-05-13",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Retrieval-augmented generation."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let llm = LlmCall::with_env(Arc::new(azure_env(&server.uri())))
        .azure_openai(None)
        .await
        .unwrap();

    assert_eq!(llm.settings().provider, "azure_openai");
    assert_eq!(llm.settings().deployment.as_deref(), Some("gpt-4o"));
    assert_eq!(llm.settings().api_version.as_deref(), Some("2024-02-01"));

    let response = llm
        .chat(&[
            ChatMessage::system("Be brief."),
            ChatMessage::user("What is RAG?"),
        ])
        .await
        .unwrap();

    assert_eq!(response.content, "Retrieval-augmented generation.");
    assert_eq!(response.model, "gpt-4o-2024-05-13");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.completion_tokens, 4);
    assert_eq!(usage.total_tokens, 16);
}

#[tokio::test]
async fn test_azure_chat_error_body_becomes_llm_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": "429", "message": "Rate limit exceeded"}
        })))
        .mount(&server)
        .await;

    let llm = LlmCall::with_env(Arc::new(azure_env(&server.uri())))
        .azure_openai(Some(0.0))
        .await
        .unwrap();

    let err = llm.complete("hello").await.unwrap_err();
    match err {
        RagkitError::Llm { message } => {
            assert!(message.contains("429"), "unexpected message: {message}");
            assert!(message.contains("Rate limit exceeded"));
        }
        other => panic!("expected an LLM error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_azure_embeddings_are_returned_in_input_order() {
    let server = MockServer::start().await;

    // Azure does not promise to return items in input order
    Mock::given(method("POST"))
        .and(path("/openai/deployments/embed-small/embeddings"))
        .and(query_param("api-version", "2023-05-15"))
        .and(header("api-key", API_KEY))
        .and(body_partial_json(json!({
            "input": ["first", "second"],
            "model": "text-embedding-3-small"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "model": "text-embedding-3-small",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [0.0, 1.0]},
                {"object": "embedding", "index": 0, "embedding": [1.0, 0.0]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = Embeddings::with_env(Arc::new(azure_env(&server.uri())))
        .azure_openai()
        .await
        .unwrap();

    let vectors = embedder.embed_batch(vec!["first", "second"]).await.unwrap();
    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
}

#[tokio::test]
async fn test_azure_embeddings_empty_batch_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let embedder = Embeddings::with_env(Arc::new(azure_env(&server.uri())))
        .azure_openai()
        .await
        .unwrap();

    assert!(embedder.embed_batch(vec![]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_azure_embeddings_count_mismatch_is_embedding_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/embed-small/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.5]}]
        })))
        .mount(&server)
        .await;

    let embedder = Embeddings::with_env(Arc::new(azure_env(&server.uri())))
        .azure_openai()
        .await
        .unwrap();

    let err = embedder.embed_batch(vec!["a", "b"]).await.unwrap_err();
    assert!(matches!(err, RagkitError::Embedding { .. }));
}

#[test_case(vars::AZURE_OPENAI_ENDPOINT ; "endpoint")]
#[test_case(vars::AZURE_OPENAI_API_KEY ; "api key")]
#[test_case(vars::AZURE_OPENAI_CHAT_DEPLOYMENT_NAME ; "deployment")]
#[test_case(vars::AZURE_OPENAI_CHAT_API_VERSION ; "api version")]
#[tokio::test]
async fn test_azure_chat_missing_variable(missing: &str) {
    let env = azure_env("https://res.openai.azure.com").without(missing);

    let err = LlmCall::with_env(Arc::new(env))
        .azure_openai(None)
        .await
        .unwrap_err();

    assert!(
        matches!(err, RagkitError::MissingEnvVar { ref name } if name == missing),
        "unexpected error: {err:?}"
    );
}

#[test_case(vars::AZURE_OPENAI_ENDPOINT ; "endpoint")]
#[test_case(vars::AZURE_OPENAI_API_KEY ; "api key")]
#[test_case(vars::AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME ; "deployment")]
#[test_case(vars::AZURE_OPENAI_EMBEDDING_API_VERSION ; "api version")]
#[tokio::test]
async fn test_azure_embedding_missing_variable(missing: &str) {
    let env = azure_env("https://res.openai.azure.com").without(missing);

    let err = Embeddings::with_env(Arc::new(env))
        .azure_openai()
        .await
        .unwrap_err();

    assert!(matches!(err, RagkitError::MissingEnvVar { ref name } if name == missing));
}

#[tokio::test]
async fn test_azure_settings_serialize_without_the_api_key() {
    let llm = LlmCall::with_env(Arc::new(azure_env("https://res.openai.azure.com")))
        .azure_openai(None)
        .await
        .unwrap();

    let settings = serde_json::to_string(llm.settings()).unwrap();
    assert!(settings.contains("gpt-4o"));
    assert!(!settings.contains(API_KEY));
    assert!(!format!("{:?}", llm.settings()).contains(API_KEY));
}
