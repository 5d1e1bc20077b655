//! Local sentence embeddings with Candle.
//!
//! Loads a BERT-family sentence-transformers model from the Hugging Face Hub
//! and embeds text in-process.
//!
//! - `config`: [`CandleEmbedderConfig`], derived from an `EmbeddingBackend`
//! - `tokenizer`: truncation, per-batch padding, tensor building
//! - `model`: BERT forward pass and mean pooling
//! - `embedder`: the [`CandleEmbedder`] client

pub mod config;
pub mod embedder;
pub mod model;
pub mod tokenizer;

pub use config::CandleEmbedderConfig;
pub use embedder::CandleEmbedder;
