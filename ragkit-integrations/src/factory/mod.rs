//! Provider-selecting factories.
//!
//! [`LlmCall`] and [`Embeddings`] are independent: each resolves one backend
//! selection through a single `create` match, and the named per-provider
//! methods are thin wrappers over it.

pub mod embeddings;
pub mod llm;

pub use embeddings::Embeddings;
pub use llm::LlmCall;
