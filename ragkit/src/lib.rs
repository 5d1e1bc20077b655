//! # ragkit
//!
//! Two factories that hand out ready-to-use LLM chat and embedding clients
//! for a retrieval-augmented generation pipeline.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ragkit::prelude::*;
//!
//! # async fn example() -> ragkit::core::Result<()> {
//! let llm = LlmCall::new().chat_ollama(None, None).await?;
//! let answer = llm.complete("What is retrieval-augmented generation?").await?;
//!
//! let embedder = Embeddings::new().huggingface(None).await?;
//! let vector = embedder.embed(&answer).await?;
//! println!("{} dimensions", vector.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **ragkit-core**: the `ChatModel` and `Embedder` traits, backend
//!   configuration records, environment lookup, and errors
//! - **ragkit-integrations**: Azure OpenAI, Groq, Ollama, and in-process
//!   Hugging Face clients, plus the `LlmCall` and `Embeddings` factories
//!
//! Credentials and endpoints are read from the process environment (and a
//! `.env` file when present):
//!
//! | Backend | Variables |
//! |---|---|
//! | Azure OpenAI chat | `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_CHAT_DEPLOYMENT_NAME`, `AZURE_OPENAI_CHAT_API_VERSION` |
//! | Azure OpenAI embeddings | `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_EMBEDDING_DEPLOYMENT_NAME`, `AZURE_OPENAI_EMBEDDING_API_VERSION` |
//! | Hugging Face chat | `HUGGINGFACE_TOKEN` |
//! | Groq | `GROQ_API_KEY` |
//! | Ollama | `OLLAMA_BASE_URL` (optional) |

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export all public APIs from sub-crates
pub use ragkit_core as core;
pub use ragkit_integrations as integrations;

pub use ragkit_integrations::{Embeddings, LlmCall};

/// Prelude module for convenient imports.
///
/// Re-exports the core prelude together with both factories.
pub mod prelude {
    pub use ragkit_core::prelude::*;

    pub use ragkit_integrations::{Embeddings, LlmCall};
}

/// Version information for ragkit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
