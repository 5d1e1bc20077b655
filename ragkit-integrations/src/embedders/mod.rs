//! Embedding clients.
//!
//! Concrete implementations of the [`Embedder`](ragkit_core::Embedder) trait
//! for each embedding backend.

pub mod azure;

#[cfg(feature = "local")]
pub mod candle;

pub use azure::AzureEmbedder;

#[cfg(feature = "local")]
pub use candle::{CandleEmbedder, CandleEmbedderConfig};
