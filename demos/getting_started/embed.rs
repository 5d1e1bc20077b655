//! Embed - embed a few sentences and compare them
//!
//! To run this demo:
//! ```bash
//! cargo run --bin embed
//! cargo run --bin embed -- azure_openai
//! ```

use anyhow::{Result, bail};
use ragkit::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SENTENCES: [&str; 3] = [
    "The cat sits on the mat.",
    "A cat is sitting on a mat.",
    "Quarterly revenue grew by eight percent.",
];

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm = |v: &[f32]| v.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm(a) * norm(b))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let provider = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "huggingface".to_string());

    let factory = Embeddings::new();
    let embedder = match provider.as_str() {
        "huggingface" | "hf" => factory.huggingface(None).await?,
        "azure_openai" | "azure" => factory.azure_openai().await?,
        other => bail!("unknown provider {other}; expected huggingface or azure_openai"),
    };
    info!(
        "Embedder {} ({} dimensions)",
        embedder.model_name(),
        embedder.dimension()
    );

    let vectors = embedder.embed_batch(SENTENCES.to_vec()).await?;
    for (i, a) in SENTENCES.iter().enumerate() {
        for (j, b) in SENTENCES.iter().enumerate().skip(i + 1) {
            println!("{:.3}  {a:?} / {b:?}", cosine(&vectors[i], &vectors[j]));
        }
    }

    Ok(())
}
