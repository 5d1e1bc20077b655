//! Integration tests for in-process Hugging Face inference.
//!
//! These download real models from the Hub and are ignored by default.
//! Run with: `cargo test -p ragkit-integrations -- --ignored`
//! (chat tests additionally need `HUGGINGFACE_TOKEN` with access to the
//! gated model).

#![cfg(feature = "local")]

use std::sync::Arc;

use ragkit_core::config::{EmbeddingBackend, MapEnv, ProcessEnv};
use ragkit_integrations::{Embeddings, LlmCall};

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b)
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_minilm_embeddings() {
    let embedder = Embeddings::with_env(Arc::new(MapEnv::new()))
        .huggingface(None)
        .await
        .expect("failed to load all-MiniLM-L6-v2");

    assert_eq!(embedder.dimension(), 384);
    assert!(!embedder.normalizes());

    let vectors = embedder
        .embed_batch(vec![
            "The cat sits on the mat.",
            "A cat is sitting on a mat.",
            "Quarterly revenue grew by eight percent.",
        ])
        .await
        .unwrap();

    assert_eq!(vectors.len(), 3);
    assert!(vectors.iter().all(|v| v.len() == 384));
    assert!(cosine(&vectors[0], &vectors[1]) > cosine(&vectors[0], &vectors[2]));
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_normalized_embeddings_have_unit_length() {
    let backend = EmbeddingBackend::default()
        .with_normalize(true)
        .with_batch_size(1);
    let embedder = Embeddings::with_env(Arc::new(MapEnv::new()))
        .create(&backend)
        .await
        .unwrap();

    let vectors = embedder.embed_batch(vec!["one", "two"]).await.unwrap();
    for vector in vectors {
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        approx::assert_relative_eq!(norm, 1.0, epsilon = 1e-4);
    }
}

#[tokio::test]
#[ignore] // Requires network access and a Hub token
async fn test_gemma_chat_generates_text() {
    let llm = LlmCall::with_env(Arc::new(ProcessEnv::with_dotenv()))
        .huggingface(None, Some(0.0))
        .await
        .expect("failed to load google/gemma-2b-it");

    let response = llm.complete("Name one primary color.").await.unwrap();
    assert!(!response.trim().is_empty());
    assert!(llm.settings().device.is_some());
}
