//! Prelude module for convenient imports.
//!
//! ```rust
//! use ragkit_core::prelude::*;
//!
//! let message = ChatMessage::user("What is retrieval-augmented generation?");
//! assert_eq!(message.role, MessageRole::User);
//! ```

pub use crate::error::{RagkitError, Result};

pub use crate::types::{ChatMessage, ChatResponse, ClientSettings, MessageRole, TokenUsage};

pub use crate::traits::{ChatModel, Embedder};

pub use crate::config::{
    AzureChatConfig, AzureDeployment, ChatBackend, EmbeddingBackend, EnvSource, GenerationConfig,
    GroqChatConfig, HubCredentials, HuggingFaceChatConfig, MapEnv, OllamaChatConfig, ProcessEnv,
};

pub use crate::factory::{EmbedderFactory, LlmFactory};
