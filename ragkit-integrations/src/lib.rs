//! Provider clients and factories for ragkit.
//!
//! [`LlmCall`] builds chat clients and [`Embeddings`] builds embedding
//! clients. Azure OpenAI is reached over plain HTTP, Groq and Ollama through
//! `siumai`, and Hugging Face models run in-process with Candle when the
//! `local` feature is enabled (the default).

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod azure;
pub mod embedders;
pub mod factory;
pub mod llm;

#[cfg(feature = "local")]
pub mod local;

// Re-export commonly used types
pub use embedders::AzureEmbedder;
pub use factory::{Embeddings, LlmCall};
pub use llm::{AzureChatClient, SiumaiChatClient};

#[cfg(feature = "local")]
pub use embedders::CandleEmbedder;
#[cfg(feature = "local")]
pub use llm::LocalChatModel;
