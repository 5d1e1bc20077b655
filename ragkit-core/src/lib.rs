//! # Ragkit Core
//!
//! Core traits, configuration records, and errors shared by the ragkit
//! client factories.
//!
//! - **Backends**: [`config::ChatBackend`] and [`config::EmbeddingBackend`]
//!   select a provider and carry its settings
//! - **Environment**: [`config::EnvSource`] abstracts where endpoints, keys,
//!   and tokens come from
//! - **Capabilities**: [`ChatModel`] and [`Embedder`] are implemented by every
//!   client a factory returns
//! - **Errors**: [`RagkitError`] with a [`Result`] alias
//!
//! ## Quick Start
//!
//! ```rust
//! use ragkit_core::prelude::*;
//!
//! let backend = ChatBackend::Groq(GroqChatConfig::default().with_temperature(0.2));
//! assert!(backend.validate().is_ok());
//!
//! let env = MapEnv::new();
//! let err = AzureDeployment::chat_from_env(&env).unwrap_err();
//! assert!(err.is_configuration_error());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used types and traits
pub mod prelude;

// Core modules
pub mod config;
pub mod error;
pub mod factory;
pub mod traits;
pub mod types;

// Re-export key types at crate root for convenience
pub use error::{RagkitError, Result};
pub use types::{ChatMessage, ChatResponse, ClientSettings, MessageRole, TokenUsage};

// Re-export traits for convenience
pub use traits::*;

/// Version information for the ragkit core library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the ragkit core library.
pub const NAME: &str = env!("CARGO_PKG_NAME");
