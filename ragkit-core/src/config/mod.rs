//! Configuration types for ragkit.
//!
//! Backend records ([`ChatBackend`], [`EmbeddingBackend`]) are serializable
//! and validatable. Everything secret or deployment-specific is read from an
//! [`EnvSource`] when a client is built.

pub mod credentials;
pub mod embedder;
pub mod env;
pub mod llm;

// Re-export all config types for convenience
pub use credentials::*;
pub use embedder::*;
pub use env::{EnvSource, MapEnv, ProcessEnv, vars};
pub use llm::*;
